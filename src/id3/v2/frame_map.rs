// Frame storage and the builder that loads it from raw frames

use super::body::FrameBody;
use super::frame::{Frame, RawFrame};
use super::header::Id3Version;
use super::registry::FrameRegistry;
use log::{debug, trace, warn};
use serde::Serialize;

/// Frames stored under one identifier
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSlot {
    Single(Frame),
    Multi(Vec<Frame>),
}

impl FrameSlot {
    pub fn frames(&self) -> &[Frame] {
        match self {
            FrameSlot::Single(frame) => std::slice::from_ref(frame),
            FrameSlot::Multi(frames) => frames,
        }
    }

    pub fn first(&self) -> Option<&Frame> {
        self.frames().first()
    }

    pub fn len(&self) -> usize {
        self.frames().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        match self {
            FrameSlot::Single(frame) => vec![frame],
            FrameSlot::Multi(frames) => frames,
        }
    }
}

/// Identifier to slot map that remembers insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMap {
    slots: Vec<(String, FrameSlot)>,
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|(key, _)| key == id)
    }

    pub fn get(&self, id: &str) -> Option<&FrameSlot> {
        self.slots.iter().find(|(key, _)| key == id).map(|(_, slot)| slot)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut FrameSlot> {
        self.slots.iter_mut().find(|(key, _)| key == id).map(|(_, slot)| slot)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Store `slot` under `id`, replacing an existing slot in place
    pub fn insert(&mut self, id: impl Into<String>, slot: FrameSlot) -> Option<FrameSlot> {
        let id = id.into();
        match self.position(&id) {
            Some(index) => Some(std::mem::replace(&mut self.slots[index].1, slot)),
            None => {
                self.slots.push((id, slot));
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<FrameSlot> {
        let index = self.position(id)?;
        Some(self.slots.remove(index).1)
    }

    /// Keep only the slots for which `keep` returns true
    pub fn retain<F: FnMut(&str, &FrameSlot) -> bool>(&mut self, mut keep: F) {
        self.slots.retain(|(id, slot)| keep(id, slot));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrameSlot)> {
        self.slots.iter().map(|(id, slot)| (id.as_str(), slot))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(id, _)| id.as_str())
    }

    /// Every stored frame in order
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.slots.iter().flat_map(|(_, slot)| slot.frames())
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of individual frames
    pub fn frame_count(&self) -> usize {
        self.slots.iter().map(|(_, slot)| slot.len()).sum()
    }
}

/// What happened while a tag was read or converted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// One entry per discarded duplicate
    pub duplicate_ids: Vec<String>,
    pub duplicate_bytes: u64,
    pub empty_frame_bytes: u64,
    pub invalid_frame_bytes: u64,
    /// Bytes of the tag read from the file, header included
    pub file_read_size: u64,
    /// Frames dropped because the target version had no room for them
    pub discarded_frame_ids: Vec<String>,
}

impl Diagnostics {
    /// Duplicate identifiers joined with "; "
    pub fn duplicate_frame_id(&self) -> String {
        self.duplicate_ids.join("; ")
    }
}

/// Loads frames into a `FrameMap`, keeping diagnostics as it goes
#[derive(Debug)]
pub struct FrameMapBuilder {
    version: Id3Version,
    registry: &'static FrameRegistry,
    frames: FrameMap,
    diagnostics: Diagnostics,
}

impl FrameMapBuilder {
    pub fn new(version: Id3Version) -> Self {
        FrameMapBuilder {
            version,
            registry: FrameRegistry::for_version(version),
            frames: FrameMap::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn version(&self) -> Id3Version {
        self.version
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Interpret a raw frame and load it
    pub fn push_raw(&mut self, raw: &RawFrame<'_>) {
        let wire_size = raw.wire_size(self.version) as u64;
        if raw.size == 0 {
            debug!("Skipping empty frame {}", raw.id);
            self.diagnostics.empty_frame_bytes += wire_size;
            return;
        }

        let flags = raw.retained_flags(self.version);
        let body = if raw.is_opaque(self.version) {
            trace!("Frame {} is compressed or encrypted, keeping it opaque", raw.id);
            FrameBody::Unsupported(raw.data.to_vec())
        } else {
            let kind = self.registry.kind_of(raw.id);
            let parsed = raw
                .payload(self.version)
                .and_then(|payload| FrameBody::parse(kind, &payload, self.version));
            match parsed {
                Some(body) => body,
                None => {
                    warn!("Frame {} is malformed, keeping its payload", raw.id);
                    self.diagnostics.invalid_frame_bytes += wire_size;
                    FrameBody::Unsupported(raw.data.to_vec())
                }
            }
        };

        let frame = Frame { id: raw.id.to_string(), flags, body };
        self.load(frame, wire_size);
    }

    /// Load a frame, recording it as a duplicate if its identifier is taken and
    /// may only appear once
    pub fn load(&mut self, frame: Frame, wire_size: u64) {
        if let Some(rejected) = self.insert(frame) {
            debug!("Discarding duplicate frame {}", rejected.id);
            self.diagnostics.duplicate_bytes += wire_size;
            self.diagnostics.duplicate_ids.push(rejected.id);
        }
    }

    /// Insert a frame, returning it if it was rejected as a duplicate
    pub fn insert(&mut self, frame: Frame) -> Option<Frame> {
        let multiple = self.registry.is_multiple_allowed(&frame.id);
        match self.frames.get_mut(&frame.id) {
            None => {
                let id = frame.id.clone();
                self.frames.insert(id, FrameSlot::Single(frame));
                None
            }
            Some(slot) => match slot {
                FrameSlot::Multi(frames) => {
                    frames.push(frame);
                    None
                }
                FrameSlot::Single(_) if multiple => {
                    if let FrameSlot::Single(existing) = std::mem::replace(slot, FrameSlot::Multi(Vec::new())) {
                        *slot = FrameSlot::Multi(vec![existing, frame]);
                    }
                    None
                }
                FrameSlot::Single(_) => Some(frame),
            },
        }
    }

    /// Whether a frame with this identifier has been loaded
    pub fn contains(&self, id: &str) -> bool {
        self.frames.contains(id)
    }

    pub fn slot_mut(&mut self, id: &str) -> Option<&mut FrameSlot> {
        self.frames.get_mut(id)
    }

    /// Replace whatever is stored under the frame's identifier
    pub fn replace(&mut self, frame: Frame) {
        let id = frame.id.clone();
        self.frames.insert(id, FrameSlot::Single(frame));
    }

    pub fn finish(self) -> (FrameMap, Diagnostics) {
        (self.frames, self.diagnostics)
    }
}
