// Unified metadata field mapping system
//
// Generic field keys name a piece of metadata independently of the container.
// Each container stores it under its own native key:
// - ID3v2: Frame IDs, which differ between v2.2 (TT2, TP1, ...) and v2.3/v2.4 (TIT2, TPE1, ...)
// - FLAC/OGG: Vorbis Comment keys (TITLE, ARTIST, ALBUM, etc.)
// - MP4: iTunes atoms (©nam, ©ART, ©alb, etc.)
// - APE: Tag field names (Title, Artist, Album, etc.)
//
// Containers expose their fields through the `TagFields` trait.

use crate::error::{Result, TagError};
use crate::id3::genres;
use crate::id3::v2::Id3Version;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Generic metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKey {
    Title,
    Artist,
    AlbumArtist,
    Album,
    Year,
    Track,
    TrackTotal,
    DiscNo,
    DiscTotal,
    Genre,
    Comment,
    Composer,
    Lyrics,
    Bpm,
    Encoder,
    Mood,
    CoverArt,
}

impl FieldKey {
    pub const ALL: [FieldKey; 17] = [
        FieldKey::Title,
        FieldKey::Artist,
        FieldKey::AlbumArtist,
        FieldKey::Album,
        FieldKey::Year,
        FieldKey::Track,
        FieldKey::TrackTotal,
        FieldKey::DiscNo,
        FieldKey::DiscTotal,
        FieldKey::Genre,
        FieldKey::Comment,
        FieldKey::Composer,
        FieldKey::Lyrics,
        FieldKey::Bpm,
        FieldKey::Encoder,
        FieldKey::Mood,
        FieldKey::CoverArt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Title => "TITLE",
            FieldKey::Artist => "ARTIST",
            FieldKey::AlbumArtist => "ALBUM_ARTIST",
            FieldKey::Album => "ALBUM",
            FieldKey::Year => "YEAR",
            FieldKey::Track => "TRACK",
            FieldKey::TrackTotal => "TRACK_TOTAL",
            FieldKey::DiscNo => "DISC_NO",
            FieldKey::DiscTotal => "DISC_TOTAL",
            FieldKey::Genre => "GENRE",
            FieldKey::Comment => "COMMENT",
            FieldKey::Composer => "COMPOSER",
            FieldKey::Lyrics => "LYRICS",
            FieldKey::Bpm => "BPM",
            FieldKey::Encoder => "ENCODER",
            FieldKey::Mood => "MOOD",
            FieldKey::CoverArt => "COVER_ART",
        }
    }

    /// Whether the key is one half of a number/total pair
    pub fn is_pair(&self) -> bool {
        matches!(self, FieldKey::Track | FieldKey::TrackTotal | FieldKey::DiscNo | FieldKey::DiscTotal)
    }

    /// Whether the key addresses the total half of a pair
    pub fn is_total(&self) -> bool {
        matches!(self, FieldKey::TrackTotal | FieldKey::DiscTotal)
    }
}

impl FromStr for FieldKey {
    type Err = TagError;

    /// Parse case-insensitively; `-` and ` ` are accepted in place of `_`
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| TagError::KeyNotFound(s.to_string()))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native keys for one generic field
struct KeyMapping {
    key: FieldKey,
    id3v22: Option<&'static str>,
    id3v23: Option<&'static str>,
    id3v24: Option<&'static str>,
    vorbis: &'static str,
    mp4: &'static [u8; 4],
    ape: &'static str,
}

macro_rules! mapping {
    ($key:ident, $v22:expr, $v23:expr, $v24:expr, $vorbis:literal, $mp4:literal, $ape:literal) => {
        KeyMapping {
            key: FieldKey::$key,
            id3v22: $v22,
            id3v23: $v23,
            id3v24: $v24,
            vorbis: $vorbis,
            mp4: $mp4,
            ape: $ape,
        }
    };
}

const MAPPINGS: &[KeyMapping] = &[
    mapping!(Title, Some("TT2"), Some("TIT2"), Some("TIT2"), "TITLE", b"\xA9nam", "Title"),
    mapping!(Artist, Some("TP1"), Some("TPE1"), Some("TPE1"), "ARTIST", b"\xA9ART", "Artist"),
    mapping!(AlbumArtist, Some("TP2"), Some("TPE2"), Some("TPE2"), "ALBUMARTIST", b"aART", "Album Artist"),
    mapping!(Album, Some("TAL"), Some("TALB"), Some("TALB"), "ALBUM", b"\xA9alb", "Album"),
    mapping!(Year, Some("TYE"), Some("TYER"), Some("TDRC"), "DATE", b"\xA9day", "Year"),
    mapping!(Track, Some("TRK"), Some("TRCK"), Some("TRCK"), "TRACKNUMBER", b"trkn", "Track"),
    mapping!(TrackTotal, Some("TRK"), Some("TRCK"), Some("TRCK"), "TRACKTOTAL", b"trkn", "Track"),
    mapping!(DiscNo, Some("TPA"), Some("TPOS"), Some("TPOS"), "DISCNUMBER", b"disk", "Disc"),
    mapping!(DiscTotal, Some("TPA"), Some("TPOS"), Some("TPOS"), "DISCTOTAL", b"disk", "Disc"),
    mapping!(Genre, Some("TCO"), Some("TCON"), Some("TCON"), "GENRE", b"\xA9gen", "Genre"),
    mapping!(Comment, Some("COM"), Some("COMM"), Some("COMM"), "COMMENT", b"\xA9cmt", "Comment"),
    mapping!(Composer, Some("TCM"), Some("TCOM"), Some("TCOM"), "COMPOSER", b"\xA9wrt", "Composer"),
    mapping!(Lyrics, Some("ULT"), Some("USLT"), Some("USLT"), "LYRICS", b"\xA9lyr", "Lyrics"),
    mapping!(Bpm, Some("TBP"), Some("TBPM"), Some("TBPM"), "BPM", b"tmpo", "BPM"),
    mapping!(Encoder, Some("TEN"), Some("TENC"), Some("TENC"), "ENCODER", b"\xA9too", "EncodedBy"),
    mapping!(Mood, None, None, Some("TMOO"), "MOOD", b"----", "Mood"),
    mapping!(CoverArt, Some("PIC"), Some("APIC"), Some("APIC"), "METADATA_BLOCK_PICTURE", b"covr", "Cover Art (Front)"),
];

/// Format-specific field mappings
pub struct FieldMappings;

impl FieldMappings {
    fn mapping(key: FieldKey) -> &'static KeyMapping {
        // every key has exactly one row
        &MAPPINGS[FieldKey::ALL.iter().position(|k| *k == key).unwrap_or(0)]
    }

    /// ID3v2 frame ID for a field, `None` when the version has no such frame
    pub fn to_id3v2(key: FieldKey, version: Id3Version) -> Option<&'static str> {
        let mapping = Self::mapping(key);
        match version {
            Id3Version::V22 => mapping.id3v22,
            Id3Version::V23 => mapping.id3v23,
            Id3Version::V24 => mapping.id3v24,
        }
    }

    /// Vorbis Comment key for a field
    pub fn to_vorbis(key: FieldKey) -> &'static str {
        Self::mapping(key).vorbis
    }

    /// MP4 atom for a field
    pub fn to_mp4(key: FieldKey) -> &'static [u8; 4] {
        Self::mapping(key).mp4
    }

    /// APE tag field for a field
    pub fn to_ape(key: FieldKey) -> &'static str {
        Self::mapping(key).ape
    }

    /// First field stored under an ID3v2 frame ID of any version
    ///
    /// Shared frames (TRCK, TPOS) resolve to the number half of the pair.
    pub fn from_id3v2(frame_id: &str) -> Option<FieldKey> {
        MAPPINGS
            .iter()
            .find(|m| [m.id3v22, m.id3v23, m.id3v24].contains(&Some(frame_id)))
            .map(|m| m.key)
    }

    /// Convert Vorbis Comment key to field
    pub fn from_vorbis(key: &str) -> Option<FieldKey> {
        let key = key.to_uppercase();
        match key.as_str() {
            "YEAR" => Some(FieldKey::Year),
            "COVERART" => Some(FieldKey::CoverArt),
            _ => MAPPINGS.iter().find(|m| m.vorbis == key).map(|m| m.key),
        }
    }

    /// Convert APE tag field to field
    pub fn from_ape(key: &str) -> Option<FieldKey> {
        MAPPINGS.iter().find(|m| m.ape.eq_ignore_ascii_case(key)).map(|m| m.key)
    }
}

/// A number with an optional total, as stored in track and disc frames ("3/12")
///
/// Zero means unset in either half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NumberPair {
    pub number: u32,
    pub total: u32,
}

impl NumberPair {
    pub fn new(number: u32, total: u32) -> Self {
        NumberPair { number, total }
    }

    /// Parse leniently; halves that aren't numbers count as unset
    pub fn parse(text: &str) -> Self {
        let mut parts = text.trim().splitn(2, '/');
        let mut half = || parts.next().and_then(|part| part.trim().parse().ok()).unwrap_or(0);
        let number = half();
        let total = half();
        NumberPair { number, total }
    }

    /// Overlay the set halves of `other`
    pub fn merge(self, other: NumberPair) -> Self {
        NumberPair {
            number: if other.number > 0 { other.number } else { self.number },
            total: if other.total > 0 { other.total } else { self.total },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.number == 0 && self.total == 0
    }

    pub fn to_text(&self) -> String {
        if self.total > 0 {
            format!("{}/{}", self.number, self.total)
        } else {
            self.number.to_string()
        }
    }
}

/// Metadata value converter for handling format-specific value formats
pub struct ValueConverter;

impl ValueConverter {
    /// Four-digit year at the start of `year` ("2024-01-15" gives "2024")
    pub fn normalize_year(year: &str) -> Option<String> {
        let year = year.trim();
        match year.get(..4) {
            Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => Some(digits.to_string()),
            _ => None,
        }
    }

    /// Strict unsigned number, as required for track, disc and BPM values
    pub fn parse_number(value: &str) -> Option<u32> {
        value.trim().parse().ok()
    }

    /// Genre name for an ID3v1 genre index
    pub fn parse_genre_id3v1(genre_id: u8) -> Option<&'static str> {
        genres::genre_name(genre_id)
    }
}

/// Uniform access to a tag's fields by generic key
///
/// Absent values read as empty strings. Keys the container can't store fail
/// with `TagError::KeyNotFound`; values the target frame can't hold fail with
/// `TagError::InvalidValue`.
pub trait TagFields {
    type Field;

    /// First value for `key`, empty when absent
    fn get_first(&self, key: FieldKey) -> Result<String>;

    /// Every field stored for `key`, in tag order
    fn get_fields(&self, key: FieldKey) -> Result<Vec<&Self::Field>>;

    /// Build a field holding `value` without storing it
    fn create_field(&self, key: FieldKey, value: &str) -> Result<Self::Field>;

    /// Store `field`; number/total pairs merge with what is stored
    fn set_field(&mut self, field: Self::Field) -> Result<()>;

    /// Store `field` next to existing ones where the container allows repeats
    fn add_field(&mut self, field: Self::Field) -> Result<()>;

    fn delete_field(&mut self, key: FieldKey) -> Result<()>;

    /// Create and store in one step
    fn set_value(&mut self, key: FieldKey, value: &str) -> Result<()> {
        let field = self.create_field(key, value)?;
        self.set_field(field)
    }
}
