// ID3v1 tag implementation

use crate::error::Result;
use crate::field_mapping::{FieldKey, TagFields, ValueConverter};
use crate::id3::v2::{Id3Version, Id3v2Tag};
use crate::utils::encoding::{self, TextEncoding};
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// ID3v1 tag structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    /// ID3v1.1 track number
    pub track: Option<u8>,
    pub genre: u8,
}

impl Id3v1Tag {
    pub const TAG_SIZE: usize = 128;
    const TAG_ID: [u8; 3] = [b'T', b'A', b'G'];

    /// Read ID3v1 tag from the end of a file
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size < Self::TAG_SIZE as u64 {
            return Ok(None);
        }

        file.seek(SeekFrom::End(-(Self::TAG_SIZE as i64)))?;
        let mut buffer = [0u8; Self::TAG_SIZE];
        file.read_exact(&mut buffer)?;
        Ok(Self::parse(&buffer))
    }

    /// Read the tag from the last 128 bytes of `data`
    pub fn read_from_slice(data: &[u8]) -> Option<Self> {
        let start = data.len().checked_sub(Self::TAG_SIZE)?;
        Self::parse(&data[start..])
    }

    /// Parse a 128-byte tag, `None` without the `TAG` marker
    pub fn parse(buffer: &[u8]) -> Option<Self> {
        if buffer.len() != Self::TAG_SIZE || buffer[0..3] != Self::TAG_ID {
            return None;
        }

        let title = Self::parse_string(&buffer[3..33]);
        let artist = Self::parse_string(&buffer[33..63]);
        let album = Self::parse_string(&buffer[63..93]);
        let year = Self::parse_string(&buffer[93..97]);

        // Check for ID3v1.1 track number
        let (comment, track) = if buffer[125] == 0 && buffer[126] != 0 {
            (Self::parse_string(&buffer[97..125]), Some(buffer[126]))
        } else {
            (Self::parse_string(&buffer[97..127]), None)
        };

        Some(Id3v1Tag {
            title,
            artist,
            album,
            year,
            comment,
            track,
            genre: buffer[127],
        })
    }

    /// Parse null-terminated string
    fn parse_string(bytes: &[u8]) -> String {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        encoding::decode_text(&bytes[..end], TextEncoding::Iso8859_1).trim().to_string()
    }

    /// Serialize as a 128-byte ID3v1.1 tag; over-long values are cut off
    pub fn to_bytes(&self) -> [u8; 128] {
        let mut buffer = [0u8; Self::TAG_SIZE];
        buffer[0..3].copy_from_slice(&Self::TAG_ID);
        Self::write_string(&mut buffer[3..33], &self.title);
        Self::write_string(&mut buffer[33..63], &self.artist);
        Self::write_string(&mut buffer[63..93], &self.album);
        Self::write_string(&mut buffer[93..97], &self.year);
        match self.track {
            Some(track) => {
                Self::write_string(&mut buffer[97..125], &self.comment);
                buffer[126] = track;
            }
            None => Self::write_string(&mut buffer[97..127], &self.comment),
        }
        buffer[127] = self.genre;
        buffer
    }

    fn write_string(slot: &mut [u8], text: &str) {
        let bytes = encoding::encode_text(text, TextEncoding::Iso8859_1);
        let len = bytes.len().min(slot.len());
        slot[..len].copy_from_slice(&bytes[..len]);
    }

    /// Genre name, `None` for 255 and other unassigned indices
    pub fn genre_name(&self) -> Option<&'static str> {
        ValueConverter::parse_genre_id3v1(self.genre)
    }

    /// Equivalent ID3v2 tag of `version`
    ///
    /// Values the target frames can't hold, such as a malformed year, are skipped.
    pub fn to_v2(&self, version: Id3Version) -> Id3v2Tag {
        let mut tag = Id3v2Tag::new(version);
        let track = self.track.map(|t| t.to_string()).unwrap_or_default();
        let fields = [
            (FieldKey::Title, self.title.as_str()),
            (FieldKey::Artist, self.artist.as_str()),
            (FieldKey::Album, self.album.as_str()),
            (FieldKey::Year, self.year.as_str()),
            (FieldKey::Comment, self.comment.as_str()),
            (FieldKey::Track, track.as_str()),
            (FieldKey::Genre, self.genre_name().unwrap_or("")),
        ];

        for (key, value) in fields {
            if value.is_empty() {
                continue;
            }
            if let Err(e) = tag.set_value(key, value) {
                debug!("Skipping ID3v1 {}: {}", key, e);
            }
        }
        tag
    }

    /// Blank the `TAG` marker at the end of the file, leaving the rest in place
    ///
    /// Returns whether a tag was found.
    pub fn delete_from_file<P: AsRef<Path>>(path: P) -> Result<bool> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        if file.metadata()?.len() < Self::TAG_SIZE as u64 {
            return Ok(false);
        }

        file.seek(SeekFrom::End(-(Self::TAG_SIZE as i64)))?;
        let mut marker = [0u8; 3];
        file.read_exact(&mut marker)?;
        if marker != Self::TAG_ID {
            return Ok(false);
        }

        file.seek(SeekFrom::End(-(Self::TAG_SIZE as i64)))?;
        file.write_all(&[0u8; 3])?;
        file.sync_all()?;
        info!("Deleted ID3v1 tag from {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub(crate) fn sample_tag() -> Vec<u8> {
        let mut buffer = vec![0u8; Id3v1Tag::TAG_SIZE];
        buffer[0..3].copy_from_slice(b"TAG");
        buffer[3..8].copy_from_slice(b"Title");
        buffer[33..39].copy_from_slice(b"Artist");
        buffer[63..68].copy_from_slice(b"Album");
        buffer[93..97].copy_from_slice(b"1998");
        buffer[97..104].copy_from_slice(b"Comment");
        buffer[126] = 7;
        buffer[127] = 17;
        buffer
    }

    #[test]
    fn test_parse_v11() {
        let tag = Id3v1Tag::parse(&sample_tag()).unwrap();
        assert_eq!(tag.title, "Title");
        assert_eq!(tag.comment, "Comment");
        assert_eq!(tag.track, Some(7));
        assert_eq!(tag.genre_name(), Some("Rock"));
        assert!(Id3v1Tag::parse(&[0u8; 128]).is_none());
    }

    #[test]
    fn test_serialize() {
        let tag = Id3v1Tag::parse(&sample_tag()).unwrap();
        assert_eq!(tag.to_bytes().to_vec(), sample_tag());

        let long = Id3v1Tag { title: "x".repeat(40), ..Id3v1Tag::default() };
        assert_eq!(Id3v1Tag::parse(&long.to_bytes()).unwrap().title, "x".repeat(30));
    }

    #[test]
    fn test_convert_to_v2() {
        let tag = Id3v1Tag::parse(&sample_tag()).unwrap();
        let v24 = tag.to_v2(Id3Version::V24);
        assert_eq!(v24.get_first(FieldKey::Title).unwrap(), "Title");
        assert_eq!(v24.get_first(FieldKey::Year).unwrap(), "1998");
        assert_eq!(v24.get_first(FieldKey::Track).unwrap(), "7");
        assert_eq!(v24.get_first(FieldKey::Genre).unwrap(), "Rock");

        let v22 = tag.to_v2(Id3Version::V22);
        assert_eq!(v22.get_first_by_id("TT2"), "Title");
        assert_eq!(v22.get_first(FieldKey::Comment).unwrap(), "Comment");
    }

    #[test]
    fn test_read_and_delete_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        let mut bytes = b"audio".to_vec();
        bytes.extend(sample_tag());
        std::fs::write(&path, &bytes).unwrap();

        assert_eq!(Id3v1Tag::read_from_file(&path).unwrap().unwrap().artist, "Artist");
        assert!(Id3v1Tag::delete_from_file(&path).unwrap());
        assert!(Id3v1Tag::read_from_file(&path).unwrap().is_none());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), bytes.len() as u64);
        assert!(!Id3v1Tag::delete_from_file(&path).unwrap());
    }
}
