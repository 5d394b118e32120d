// ID3v2 tag header and version handling

use crate::error::{Result, TagError};
use crate::utils::synchsafe;
use serde::Serialize;
use std::fmt;

/// Supported ID3v2 major versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Id3Version {
    V22,
    V23,
    V24,
}

impl Id3Version {
    pub fn from_major(major: u8) -> Option<Self> {
        match major {
            2 => Some(Id3Version::V22),
            3 => Some(Id3Version::V23),
            4 => Some(Id3Version::V24),
            _ => None,
        }
    }

    pub fn major(self) -> u8 {
        match self {
            Id3Version::V22 => 2,
            Id3Version::V23 => 3,
            Id3Version::V24 => 4,
        }
    }

    /// Width of a frame identifier
    pub fn frame_id_len(self) -> usize {
        match self {
            Id3Version::V22 => 3,
            Id3Version::V23 | Id3Version::V24 => 4,
        }
    }

    /// Width of a frame header: identifier, size and (v2.3+) two flag bytes
    pub fn frame_header_len(self) -> usize {
        match self {
            Id3Version::V22 => 6,
            Id3Version::V23 | Id3Version::V24 => 10,
        }
    }

    /// Parse "2.4", "v2.4", "24" or "4"
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().trim_start_matches(['v', 'V']);
        match value {
            "2.2" | "22" | "2" => Some(Id3Version::V22),
            "2.3" | "23" | "3" => Some(Id3Version::V23),
            "2.4" | "24" | "4" => Some(Id3Version::V24),
            _ => None,
        }
    }

    /// Next version one step towards `target`
    pub fn step_towards(self, target: Id3Version) -> Id3Version {
        match self.cmp(&target) {
            std::cmp::Ordering::Less => Id3Version::from_major(self.major() + 1).unwrap_or(target),
            std::cmp::Ordering::Greater => Id3Version::from_major(self.major() - 1).unwrap_or(target),
            std::cmp::Ordering::Equal => self,
        }
    }
}

impl fmt::Display for Id3Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2.{}", self.major())
    }
}

/// Header flag bits
pub mod flags {
    pub const UNSYNCHRONISATION: u8 = 0x80;
    /// Extended header in v2.3/v2.4, compression in v2.2
    pub const EXTENDED_HEADER: u8 = 0x40;
    pub const EXPERIMENTAL: u8 = 0x20;
    pub const FOOTER: u8 = 0x10;
}

/// ID3v2 header structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
    pub version: Id3Version,
    pub revision: u8,
    pub flags: u8,
    /// Size of everything after the header, excluding any footer
    pub size: u32,
}

impl Id3v2Header {
    pub const HEADER_SIZE: usize = 10;
    pub const ID: [u8; 3] = [b'I', b'D', b'3'];

    /// Parse the 10-byte header at the start of `buffer`
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < Self::HEADER_SIZE {
            return Err(TagError::TagHeaderMismatch(format!(
                "need {} header bytes, got {}",
                Self::HEADER_SIZE,
                buffer.len()
            )));
        }

        // Check for ID3 identifier
        if buffer[0..3] != Self::ID {
            return Err(TagError::TagHeaderMismatch("missing ID3 identifier".to_string()));
        }

        let version = Id3Version::from_major(buffer[3]).ok_or_else(|| {
            TagError::TagHeaderMismatch(format!("unsupported major version {}", buffer[3]))
        })?;

        Ok(Id3v2Header {
            version,
            revision: buffer[4],
            flags: buffer[5],
            size: synchsafe::decode(&buffer[6..10])?,
        })
    }

    /// Parse and require a particular major version
    pub fn parse_expecting(buffer: &[u8], expected: Id3Version) -> Result<Self> {
        let header = Self::parse(buffer)?;
        if header.version != expected {
            return Err(TagError::TagHeaderMismatch(format!(
                "expected ID3v{}, found ID3v{}",
                expected, header.version
            )));
        }
        Ok(header)
    }

    /// Bytes the tag occupies on disk, header and footer included
    pub fn total_size(&self) -> u64 {
        let footer = if self.version == Id3Version::V24 && self.flags & flags::FOOTER != 0 {
            Self::HEADER_SIZE as u64
        } else {
            0
        };
        Self::HEADER_SIZE as u64 + self.size as u64 + footer
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Serialize a header for a freshly written tag (no flags set)
    pub fn to_bytes(version: Id3Version, size: u32) -> Result<[u8; 10]> {
        let size = synchsafe::encode(size)?;
        Ok([
            b'I', b'D', b'3', version.major(), 0, 0, size[0], size[1], size[2], size[3],
        ])
    }
}
