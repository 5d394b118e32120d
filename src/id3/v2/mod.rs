// ID3v2 tag implementation

pub mod body;
pub mod convert;
pub mod fields;
pub mod frame;
pub mod frame_map;
pub mod header;
pub mod registry;
pub mod write;

pub use body::{CommentBody, DateComponent, DateTimeBody, FrameBody, PictureBody, TextBody, UrlBody};
pub use frame::Frame;
pub use frame_map::{Diagnostics, FrameMap, FrameMapBuilder, FrameSlot};
pub use header::{Id3Version, Id3v2Header};
pub use registry::{BodyKind, FrameRegistry};
pub use write::{existing_tag_size, PaddingStrategy, WriteOptions};

use crate::error::{Result, TagError};
use crate::utils::{io as io_utils, synchsafe};
use frame::{RawFrame, RawRead};
use log::{debug, warn};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// ID3v2 tag structure
#[derive(Debug, Clone, PartialEq)]
pub struct Id3v2Tag {
    version: Id3Version,
    frames: FrameMap,
    diagnostics: Diagnostics,
}

impl Id3v2Tag {
    pub fn new(version: Id3Version) -> Self {
        Id3v2Tag { version, frames: FrameMap::new(), diagnostics: Diagnostics::default() }
    }

    pub(crate) fn from_parts(version: Id3Version, frames: FrameMap, diagnostics: Diagnostics) -> Self {
        Id3v2Tag { version, frames, diagnostics }
    }

    pub fn version(&self) -> Id3Version {
        self.version
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn frames(&self) -> &FrameMap {
        &self.frames
    }

    pub fn registry(&self) -> &'static FrameRegistry {
        FrameRegistry::for_version(self.version)
    }

    /// Whether `buffer` starts with a tag of `version`
    pub fn seek(buffer: &[u8], version: Id3Version) -> bool {
        Id3v2Header::parse_expecting(buffer, version).is_ok()
    }

    /// Parse a tag from the start of `buffer`
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let header = Id3v2Header::parse(buffer)?;
        Self::parse_frames(&header, buffer)
    }

    /// Parse a tag that must be of `expected` version
    pub fn parse_version(buffer: &[u8], expected: Id3Version) -> Result<Self> {
        let header = Id3v2Header::parse_expecting(buffer, expected)?;
        Self::parse_frames(&header, buffer)
    }

    fn parse_frames(header: &Id3v2Header, buffer: &[u8]) -> Result<Self> {
        let version = header.version;
        let start = Id3v2Header::HEADER_SIZE;
        let end = (start + header.size as usize).min(buffer.len());
        if end - start < header.size as usize {
            warn!("Tag declares {} bytes but only {} are present", header.size, end - start);
        }

        let mut data: Cow<[u8]> = Cow::Borrowed(&buffer[start..end]);
        if version != Id3Version::V24 && header.has_flag(header::flags::UNSYNCHRONISATION) {
            debug!("Reversing tag unsynchronisation");
            data = Cow::Owned(synchsafe::resynchronize(&data));
        }

        let mut builder = FrameMapBuilder::new(version);
        builder.diagnostics_mut().file_read_size = header.total_size();

        // v2.2 reuses the extended header bit for its never-defined compression scheme
        if version == Id3Version::V22 && header.has_flag(header::flags::EXTENDED_HEADER) {
            warn!("Compressed ID3v2.2 tag, frames can't be read");
            builder.diagnostics_mut().invalid_frame_bytes += data.len() as u64;
            let (frames, diagnostics) = builder.finish();
            return Ok(Id3v2Tag { version, frames, diagnostics });
        }

        let mut offset = if version != Id3Version::V22 && header.has_flag(header::flags::EXTENDED_HEADER) {
            extended_header_len(&data, version)?
        } else {
            0
        };

        while offset < data.len() {
            match RawFrame::read(&data[offset..], version) {
                RawRead::Frame(raw) => {
                    offset += raw.wire_size(version);
                    builder.push_raw(&raw);
                }
                RawRead::End => break,
                RawRead::Invalid => {
                    let remaining = (data.len() - offset) as u64;
                    warn!("Unreadable frame header at offset {}, skipping {} bytes", offset, remaining);
                    builder.diagnostics_mut().invalid_frame_bytes += remaining;
                    break;
                }
            }
        }

        let (frames, diagnostics) = builder.finish();
        debug!("Read ID3v{} tag with {} frames", version, frames.frame_count());
        Ok(Id3v2Tag { version, frames, diagnostics })
    }

    /// Read a tag from the current position of `reader`, `None` when there is no tag there
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let mut buffer = Vec::with_capacity(Id3v2Header::HEADER_SIZE);
        reader.by_ref().take(Id3v2Header::HEADER_SIZE as u64).read_to_end(&mut buffer)?;
        if buffer.len() < Id3v2Header::HEADER_SIZE || buffer[0..3] != Id3v2Header::ID {
            return Ok(None);
        }

        let header = Id3v2Header::parse(&buffer)?;
        let remaining = header.total_size() - Id3v2Header::HEADER_SIZE as u64;
        reader.by_ref().take(remaining).read_to_end(&mut buffer)?;
        Self::parse_frames(&header, &buffer).map(Some)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }

    /// Whether a frame is stored under `id`, whatever its body
    pub fn has_frame(&self, id: &str) -> bool {
        self.frames.contains(id)
    }

    /// Whether a frame with an interpreted body is stored under `id`
    pub fn has_frame_and_body(&self, id: &str) -> bool {
        self.frames
            .get(id)
            .is_some_and(|slot| slot.frames().iter().any(|frame| !frame.body.is_unsupported()))
    }

    /// Whether any identifier starts with `prefix`
    pub fn has_frame_of_type(&self, prefix: &str) -> bool {
        self.frames.ids().any(|id| id.starts_with(prefix))
    }

    pub fn get_frame(&self, id: &str) -> Option<&FrameSlot> {
        self.frames.get(id)
    }

    pub fn first_frame(&self, id: &str) -> Option<&Frame> {
        self.frames.get(id).and_then(FrameSlot::first)
    }

    /// All frames whose identifier starts with `prefix`
    pub fn frames_of_type<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Frame> + 'a {
        self.frames
            .iter()
            .filter(move |(id, _)| id.starts_with(prefix))
            .flat_map(|(_, slot)| slot.frames())
    }

    /// Frames in tag order
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.frames()
    }

    /// Number of individual frames
    pub fn frame_count(&self) -> usize {
        self.frames.frame_count()
    }

    /// Check that `frame` may be stored in this tag
    fn check_frame(&self, frame: &Frame) -> Result<()> {
        let id = frame.id.as_bytes();
        if id.len() != self.version.frame_id_len() || !frame::is_valid_id(id) {
            return Err(TagError::InvalidValue(format!(
                "{:?} is not an ID3v{} frame identifier",
                frame.id, self.version
            )));
        }
        if !frame.body.is_unsupported() && frame.body.kind() != self.registry().kind_of(&frame.id) {
            return Err(TagError::InvalidValue(format!(
                "{:?} body doesn't fit frame {}",
                frame.body.kind(),
                frame.id
            )));
        }
        Ok(())
    }

    /// Store `frame`, replacing every frame with the same identifier
    pub fn set_frame(&mut self, frame: Frame) -> Result<()> {
        self.check_frame(&frame)?;
        let id = frame.id.clone();
        self.frames.insert(id, FrameSlot::Single(frame));
        Ok(())
    }

    /// Replace the frames stored under `id`; an empty list removes them
    pub fn set_frames(&mut self, id: &str, frames: Vec<Frame>) -> Result<()> {
        for frame in &frames {
            self.check_frame(frame)?;
            if frame.id != id {
                return Err(TagError::InvalidValue(format!("frame {} stored under {}", frame.id, id)));
            }
        }

        let mut frames = frames;
        match frames.len() {
            0 => {
                self.frames.remove(id);
            }
            1 => {
                if let Some(frame) = frames.pop() {
                    self.frames.insert(id, FrameSlot::Single(frame));
                }
            }
            _ if self.registry().is_multiple_allowed(id) => {
                self.frames.insert(id, FrameSlot::Multi(frames));
            }
            count => {
                return Err(TagError::InvalidValue(format!("frame {} may appear once, got {}", id, count)));
            }
        }
        Ok(())
    }

    /// Append `frame` when its identifier may repeat, otherwise replace
    pub fn add_frame(&mut self, frame: Frame) -> Result<()> {
        self.check_frame(&frame)?;
        if !self.registry().is_multiple_allowed(&frame.id) {
            return self.set_frame(frame);
        }

        match self.frames.get_mut(&frame.id) {
            Some(slot) => {
                let existing = std::mem::replace(slot, FrameSlot::Multi(Vec::new()));
                let mut frames = existing.into_frames();
                frames.push(frame);
                *slot = FrameSlot::Multi(frames);
            }
            None => {
                let id = frame.id.clone();
                self.frames.insert(id, FrameSlot::Single(frame));
            }
        }
        Ok(())
    }

    pub fn remove_frame(&mut self, id: &str) -> Option<FrameSlot> {
        self.frames.remove(id)
    }

    /// Remove every identifier starting with `prefix`
    pub fn remove_frame_of_type(&mut self, prefix: &str) {
        self.frames.retain(|id, _| !id.starts_with(prefix));
    }

    /// Drop frames whose body couldn't be interpreted
    pub fn remove_unsupported_frames(&mut self) {
        let mut kept = FrameMap::new();
        for (id, slot) in self.frames.iter() {
            let mut frames: Vec<Frame> =
                slot.frames().iter().filter(|frame| !frame.body.is_unsupported()).cloned().collect();
            let slot = match slot {
                FrameSlot::Single(_) => match frames.pop() {
                    Some(frame) => FrameSlot::Single(frame),
                    None => continue,
                },
                FrameSlot::Multi(_) if frames.is_empty() => continue,
                FrameSlot::Multi(_) => FrameSlot::Multi(frames),
            };
            kept.insert(id, slot);
        }
        self.frames = kept;
    }

    /// Size of the serialized tag without padding, header included
    pub fn size(&self) -> usize {
        Id3v2Header::HEADER_SIZE + self.frames.frames().map(|frame| frame.wire_size(self.version)).sum::<usize>()
    }

    /// Serialize the tag followed by `padding` zero bytes
    pub fn to_bytes(&self, padding: usize) -> Result<Vec<u8>> {
        let mut frames = Vec::with_capacity(self.size() + padding);
        for frame in self.frames.frames() {
            frame.write(self.version, &mut frames)?;
        }
        frames.resize(frames.len() + padding, 0);

        let size = u32::try_from(frames.len())
            .map_err(|_| TagError::MalformedSize(format!("tag of {} bytes is too large", frames.len())))?;
        let mut out = Id3v2Header::to_bytes(self.version, size)?.to_vec();
        out.extend(frames);
        Ok(out)
    }

    /// Copy of this tag converted to `target`
    pub fn convert(&self, target: Id3Version) -> Id3v2Tag {
        convert::convert(self, target)
    }
}

/// Length of the extended header at the start of the frame area
fn extended_header_len(data: &[u8], version: Id3Version) -> Result<usize> {
    if data.len() < 4 {
        return Err(TagError::MalformedSize("extended header is truncated".to_string()));
    }
    let len = match version {
        // v2.3 excludes the size field itself
        Id3Version::V23 => io_utils::be_u32(data) as usize + 4,
        _ => synchsafe::decode(data)? as usize,
    };
    if len > data.len() {
        return Err(TagError::MalformedSize(format!(
            "extended header of {} bytes exceeds the tag",
            len
        )));
    }
    Ok(len)
}
