// ID3v2 frame structure and wire format

use super::body::{FrameBody, TextBody};
use super::header::Id3Version;
use crate::error::{Result, TagError};
use crate::utils::{io, synchsafe};

/// Frame header flag bits
pub mod flags {
    /// ID3v2.3 format flags
    pub mod v23 {
        pub const COMPRESSION: u16 = 0x0080;
        pub const ENCRYPTION: u16 = 0x0040;
        pub const GROUPING: u16 = 0x0020;
    }

    /// ID3v2.4 format flags
    pub mod v24 {
        pub const GROUPING: u16 = 0x0040;
        pub const COMPRESSION: u16 = 0x0008;
        pub const ENCRYPTION: u16 = 0x0004;
        pub const UNSYNCHRONISATION: u16 = 0x0002;
        pub const DATA_LENGTH_INDICATOR: u16 = 0x0001;
    }
}

/// Largest payload a v2.2 frame header can describe
const MAX_V22_FRAME_SIZE: usize = 0x00FF_FFFF;

/// Whether the frame's payload is compressed, encrypted or grouped and so can't be interpreted
pub fn is_opaque(frame_flags: u16, version: Id3Version) -> bool {
    match version {
        Id3Version::V22 => false,
        Id3Version::V23 => {
            frame_flags & (flags::v23::COMPRESSION | flags::v23::ENCRYPTION | flags::v23::GROUPING) != 0
        }
        Id3Version::V24 => {
            frame_flags & (flags::v24::COMPRESSION | flags::v24::ENCRYPTION | flags::v24::GROUPING) != 0
        }
    }
}

/// Frame identifiers are upper-case ASCII letters and digits
pub fn is_valid_id(id: &[u8]) -> bool {
    !id.is_empty() && id.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// A single ID3v2 frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub id: String,
    pub flags: u16,
    pub body: FrameBody,
}

impl Frame {
    pub fn new(id: impl Into<String>, body: FrameBody) -> Self {
        Frame { id: id.into(), flags: 0, body }
    }

    /// Text information frame holding `text`
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Frame::new(id, FrameBody::Text(TextBody::new(text)))
    }

    /// Payload size in a tag of `version`
    pub fn size(&self, version: Id3Version) -> usize {
        self.body.size(version)
    }

    /// Header plus payload size in a tag of `version`
    pub fn wire_size(&self, version: Id3Version) -> usize {
        version.frame_header_len() + self.size(version)
    }

    pub fn content(&self) -> String {
        self.body.content()
    }

    pub fn is_opaque(&self, version: Id3Version) -> bool {
        is_opaque(self.flags, version)
    }

    /// Append the frame's header and payload to `out`
    pub fn write(&self, version: Id3Version, out: &mut Vec<u8>) -> Result<()> {
        let id = self.id.as_bytes();
        if id.len() != version.frame_id_len() || !is_valid_id(id) {
            return Err(TagError::InvalidValue(format!(
                "frame id {:?} is not valid in ID3v{}",
                self.id, version
            )));
        }

        let payload = self.body.to_bytes(version);
        let size = payload.len();
        out.extend_from_slice(id);

        match version {
            Id3Version::V22 => {
                if size > MAX_V22_FRAME_SIZE {
                    return Err(TagError::MalformedSize(format!(
                        "frame {} is {} bytes, more than a v2.2 header can hold",
                        self.id, size
                    )));
                }
                out.extend_from_slice(&(size as u32).to_be_bytes()[1..]);
            }
            Id3Version::V23 => {
                let size = u32::try_from(size).map_err(|_| {
                    TagError::MalformedSize(format!("frame {} is {} bytes", self.id, size))
                })?;
                out.extend_from_slice(&size.to_be_bytes());
                out.extend_from_slice(&self.flags.to_be_bytes());
            }
            Id3Version::V24 => {
                let size = u32::try_from(size).map_err(|_| {
                    TagError::MalformedSize(format!("frame {} is {} bytes", self.id, size))
                })?;
                out.extend_from_slice(&synchsafe::encode(size)?);
                out.extend_from_slice(&self.flags.to_be_bytes());
            }
        }

        out.extend(payload);
        Ok(())
    }
}

/// A frame as found in the tag, before its payload is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame<'a> {
    pub id: &'a str,
    /// Declared payload size
    pub size: u32,
    pub flags: u16,
    pub data: &'a [u8],
}

/// Outcome of reading one frame header from the frame area
#[derive(Debug, PartialEq, Eq)]
pub enum RawRead<'a> {
    Frame(RawFrame<'a>),
    /// Padding or not enough bytes left for a header
    End,
    /// Unreadable header; nothing after this point can be trusted
    Invalid,
}

impl<'a> RawFrame<'a> {
    /// Read the frame starting at the beginning of `buffer`
    pub fn read(buffer: &'a [u8], version: Id3Version) -> RawRead<'a> {
        let header_len = version.frame_header_len();
        if buffer.len() < header_len || buffer[0] == 0 {
            return RawRead::End;
        }

        let id_len = version.frame_id_len();
        let id_bytes = &buffer[..id_len];
        if !is_valid_id(id_bytes) {
            return RawRead::Invalid;
        }
        let Ok(id) = std::str::from_utf8(id_bytes) else {
            return RawRead::Invalid;
        };

        let (size, flags) = match version {
            Id3Version::V22 => (io::be_u24(&buffer[3..6]), 0),
            Id3Version::V23 => (io::be_u32(&buffer[4..8]), u16::from_be_bytes([buffer[8], buffer[9]])),
            Id3Version::V24 => match synchsafe::decode(&buffer[4..8]) {
                Ok(size) => (size, u16::from_be_bytes([buffer[8], buffer[9]])),
                Err(_) => return RawRead::Invalid,
            },
        };

        let end = header_len + size as usize;
        if end > buffer.len() {
            return RawRead::Invalid;
        }

        RawRead::Frame(RawFrame { id, size, flags, data: &buffer[header_len..end] })
    }

    pub fn is_opaque(&self, version: Id3Version) -> bool {
        is_opaque(self.flags, version)
    }

    /// Header plus declared payload
    pub fn wire_size(&self, version: Id3Version) -> usize {
        version.frame_header_len() + self.size as usize
    }

    /// Payload with frame-level unsynchronisation and the data length indicator removed
    ///
    /// Opaque frames are returned untouched. `None` when a declared data length
    /// indicator doesn't fit in the payload.
    pub fn payload(&self, version: Id3Version) -> Option<Vec<u8>> {
        if version != Id3Version::V24 || is_opaque(self.flags, version) {
            return Some(self.data.to_vec());
        }

        let mut data = self.data;
        if self.flags & flags::v24::DATA_LENGTH_INDICATOR != 0 {
            data = data.get(4..)?;
        }
        if self.flags & flags::v24::UNSYNCHRONISATION != 0 {
            Some(synchsafe::resynchronize(data))
        } else {
            Some(data.to_vec())
        }
    }

    /// Flags to keep once the payload has been decoded
    pub fn retained_flags(&self, version: Id3Version) -> u16 {
        if version == Id3Version::V24 && !is_opaque(self.flags, version) {
            self.flags & !(flags::v24::UNSYNCHRONISATION | flags::v24::DATA_LENGTH_INDICATOR)
        } else {
            self.flags
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_headers_per_version() {
        let frame = Frame::text("TIT2", "Song");

        let mut v23 = Vec::new();
        frame.write(Id3Version::V23, &mut v23).unwrap();
        assert_eq!(v23, b"TIT2\x00\x00\x00\x05\x00\x00\x00Song".to_vec());

        let mut v22 = Vec::new();
        Frame::text("TT2", "Song").write(Id3Version::V22, &mut v22).unwrap();
        assert_eq!(v22, b"TT2\x00\x00\x05\x00Song".to_vec());

        assert_eq!(frame.wire_size(Id3Version::V24), 15);
    }

    #[test]
    fn test_v24_size_is_synchsafe() {
        let frame = Frame::new("PRIV", FrameBody::Binary(vec![0xAA; 200]));
        let mut out = Vec::new();
        frame.write(Id3Version::V24, &mut out).unwrap();
        assert_eq!(&out[4..8], &[0x00, 0x00, 0x01, 0x48]);
    }

    #[test]
    fn test_wrong_id_width_rejected() {
        let mut out = Vec::new();
        assert!(Frame::text("TIT2", "x").write(Id3Version::V22, &mut out).is_err());
    }

    #[test]
    fn test_read_raw_frames() {
        let data = b"TIT2\x00\x00\x00\x03\x00\x00\x00abTALB";
        match RawFrame::read(data, Id3Version::V23) {
            RawRead::Frame(raw) => {
                assert_eq!(raw.id, "TIT2");
                assert_eq!(raw.data, b"\x00ab");
                assert_eq!(raw.wire_size(Id3Version::V23), 13);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(RawFrame::read(&[0u8; 20], Id3Version::V23), RawRead::End);
        assert_eq!(RawFrame::read(b"ti t\x00\x00\x00\x01\x00\x00x", Id3Version::V23), RawRead::Invalid);
        assert_eq!(RawFrame::read(b"TIT2\x00\x00\x00\x09\x00\x00x", Id3Version::V23), RawRead::Invalid);
    }

    #[test]
    fn test_v24_frame_unsynchronisation() {
        let data = b"TIT2\x00\x00\x00\x08\x00\x03\x00\x00\x00\x03\x00\xFF\x00\xE0";
        let RawRead::Frame(raw) = RawFrame::read(data, Id3Version::V24) else {
            panic!("frame expected");
        };
        assert_eq!(raw.payload(Id3Version::V24).unwrap(), vec![0x00, 0xFF, 0xE0]);
        assert_eq!(raw.retained_flags(Id3Version::V24), 0);
    }

    #[test]
    fn test_opaque_flags() {
        assert!(is_opaque(flags::v23::COMPRESSION, Id3Version::V23));
        assert!(is_opaque(flags::v24::ENCRYPTION, Id3Version::V24));
        assert!(!is_opaque(flags::v24::UNSYNCHRONISATION, Id3Version::V24));
        assert!(!is_opaque(0xFFFF, Id3Version::V22));
    }
}
