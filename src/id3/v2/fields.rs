// Generic field access for ID3v2 tags

use super::body::{CommentBody, DateTimeBody, FrameBody, PictureBody, TextBody};
use super::frame::Frame;
use super::header::Id3Version;
use super::Id3v2Tag;
use crate::error::{Result, TagError};
use crate::field_mapping::{FieldKey, FieldMappings, NumberPair, TagFields, ValueConverter};
use crate::id3::genres;
use crate::utils::encoding::TextEncoding;
use log::debug;

/// Picture to attach to a tag
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub mime_type: String,
    pub picture_type: u8,
    pub description: String,
    pub data: Vec<u8>,
}

impl Artwork {
    /// Front cover from image bytes, MIME type sniffed from the file signature
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime_type = if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            "image/png"
        } else if data.starts_with(b"GIF8") {
            "image/gif"
        } else if data.starts_with(b"BM") {
            "image/bmp"
        } else {
            "image/jpeg"
        };
        Artwork {
            mime_type: mime_type.to_string(),
            picture_type: PictureBody::COVER_FRONT,
            description: String::new(),
            data,
        }
    }

    /// File extension matching the MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

impl From<&PictureBody> for Artwork {
    fn from(picture: &PictureBody) -> Self {
        Artwork {
            mime_type: picture.mime_type.clone(),
            picture_type: picture.picture_type,
            description: picture.description.clone(),
            data: picture.data.clone(),
        }
    }
}

impl Id3v2Tag {
    /// Native frame ID for `key` in this tag's version
    fn frame_id_for(&self, key: FieldKey) -> Result<&'static str> {
        FieldMappings::to_id3v2(key, self.version()).ok_or_else(|| {
            TagError::KeyNotFound(format!("{} has no ID3v{} frame", key, self.version()))
        })
    }

    /// First value of the first frame stored under `id`, empty when absent
    pub fn get_first_by_id(&self, id: &str) -> String {
        self.first_frame(id).map(Frame::content).unwrap_or_default()
    }

    /// Picture frame for `artwork`
    pub fn create_artwork_field(&self, artwork: &Artwork) -> Result<Frame> {
        let id = self.frame_id_for(FieldKey::CoverArt)?;
        let body = PictureBody {
            encoding: TextEncoding::Iso8859_1,
            mime_type: artwork.mime_type.clone(),
            picture_type: artwork.picture_type,
            description: artwork.description.clone(),
            data: artwork.data.clone(),
        };
        Ok(Frame::new(id, FrameBody::Picture(body)))
    }

    /// Pictures in tag order
    pub fn artwork(&self) -> Vec<Artwork> {
        let Ok(id) = self.frame_id_for(FieldKey::CoverArt) else {
            return Vec::new();
        };
        self.get_frame(id)
            .map(|slot| {
                slot.frames()
                    .iter()
                    .filter_map(|frame| match &frame.body {
                        FrameBody::Picture(picture) => Some(Artwork::from(picture)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn number_pair(&self, id: &str) -> NumberPair {
        NumberPair::parse(&self.get_first_by_id(id))
    }

    /// Genre text as stored: a numeric reference when the name is a known genre
    fn genre_text(&self, value: &str) -> String {
        match genres::genre_index(value) {
            Some(index) if self.version() == Id3Version::V24 => index.to_string(),
            Some(index) => format!("({})", index),
            None => value.to_string(),
        }
    }

    fn year_body(&self, value: &str) -> Result<FrameBody> {
        if self.version() == Id3Version::V24 {
            let date = DateTimeBody::from_text(value);
            if date.year().is_none() {
                return Err(TagError::InvalidValue(format!("{:?} is not a year or timestamp", value)));
            }
            return Ok(FrameBody::DateTime(date));
        }
        let year = ValueConverter::normalize_year(value)
            .ok_or_else(|| TagError::InvalidValue(format!("{:?} is not a year", value)))?;
        Ok(FrameBody::Text(TextBody::new(year)))
    }
}

impl TagFields for Id3v2Tag {
    type Field = Frame;

    fn get_first(&self, key: FieldKey) -> Result<String> {
        let id = self.frame_id_for(key)?;
        let value = match key {
            FieldKey::Track | FieldKey::DiscNo => {
                let pair = self.number_pair(id);
                if pair.number > 0 { pair.number.to_string() } else { String::new() }
            }
            FieldKey::TrackTotal | FieldKey::DiscTotal => {
                let pair = self.number_pair(id);
                if pair.total > 0 { pair.total.to_string() } else { String::new() }
            }
            FieldKey::Genre => {
                let text = self.get_first_by_id(id);
                match genres::resolve_reference(&text) {
                    Some(name) => name.to_string(),
                    None => text,
                }
            }
            _ => self.get_first_by_id(id),
        };
        Ok(value)
    }

    fn get_fields(&self, key: FieldKey) -> Result<Vec<&Frame>> {
        let id = self.frame_id_for(key)?;
        Ok(self.get_frame(id).map(|slot| slot.frames().iter().collect()).unwrap_or_default())
    }

    fn create_field(&self, key: FieldKey, value: &str) -> Result<Frame> {
        let id = self.frame_id_for(key)?;
        let body = match key {
            FieldKey::Track | FieldKey::TrackTotal | FieldKey::DiscNo | FieldKey::DiscTotal => {
                let number = ValueConverter::parse_number(value)
                    .ok_or_else(|| TagError::InvalidValue(format!("{} must be a number, got {:?}", key, value)))?;
                let pair = if key.is_total() { NumberPair::new(0, number) } else { NumberPair::new(number, 0) };
                FrameBody::Text(TextBody::new(pair.to_text()))
            }
            FieldKey::Bpm => {
                let bpm = ValueConverter::parse_number(value)
                    .ok_or_else(|| TagError::InvalidValue(format!("BPM must be a number, got {:?}", value)))?;
                FrameBody::Text(TextBody::new(bpm.to_string()))
            }
            FieldKey::Year => self.year_body(value)?,
            FieldKey::Genre => FrameBody::Text(TextBody::new(self.genre_text(value))),
            FieldKey::Comment | FieldKey::Lyrics => FrameBody::Comment(CommentBody::new("", value)),
            FieldKey::CoverArt => {
                return Err(TagError::InvalidValue(
                    "cover art can't be created from text, use create_artwork_field".to_string(),
                ))
            }
            _ => FrameBody::Text(TextBody::new(value)),
        };
        Ok(Frame::new(id, body))
    }

    fn set_field(&mut self, field: Frame) -> Result<()> {
        let version = self.version();
        let is_pair = [FieldKey::Track, FieldKey::DiscNo]
            .iter()
            .filter_map(|key| FieldMappings::to_id3v2(*key, version))
            .any(|id| id == field.id);
        if is_pair {
            if let FrameBody::Text(text) = &field.body {
                let merged = self.number_pair(&field.id).merge(NumberPair::parse(text.first_value()));
                debug!("Merging {} into {}", text.first_value(), field.id);
                return self.set_frame(Frame::text(field.id, merged.to_text()));
            }
        }
        self.set_frame(field)
    }

    fn add_field(&mut self, field: Frame) -> Result<()> {
        if self.registry().is_multiple_allowed(&field.id) {
            self.add_frame(field)
        } else {
            self.set_field(field)
        }
    }

    fn delete_field(&mut self, key: FieldKey) -> Result<()> {
        let id = self.frame_id_for(key)?;
        if !key.is_pair() {
            self.remove_frame(id);
            return Ok(());
        }

        let mut pair = self.number_pair(id);
        if key.is_total() {
            pair.total = 0;
        } else {
            pair.number = 0;
        }

        if pair.is_empty() {
            self.remove_frame(id);
            Ok(())
        } else {
            self.set_frame(Frame::text(id, pair.to_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_pair_merge() {
        let mut tag = Id3v2Tag::new(Id3Version::V23);
        tag.set_value(FieldKey::Track, "3").unwrap();
        tag.set_value(FieldKey::TrackTotal, "12").unwrap();

        assert_eq!(tag.get_fields(FieldKey::Track).unwrap().len(), 1);
        assert_eq!(tag.get_first_by_id("TRCK"), "3/12");
        assert_eq!(tag.get_first(FieldKey::Track).unwrap(), "3");
        assert_eq!(tag.get_first(FieldKey::TrackTotal).unwrap(), "12");

        tag.set_value(FieldKey::Track, "5").unwrap();
        assert_eq!(tag.get_first(FieldKey::Track).unwrap(), "5");
        assert_eq!(tag.get_first(FieldKey::TrackTotal).unwrap(), "12");
    }

    #[test]
    fn test_total_alone_and_pair_delete() {
        let mut tag = Id3v2Tag::new(Id3Version::V24);
        tag.set_value(FieldKey::DiscTotal, "2").unwrap();
        assert_eq!(tag.get_first(FieldKey::DiscNo).unwrap(), "");
        assert_eq!(tag.get_first(FieldKey::DiscTotal).unwrap(), "2");

        tag.set_value(FieldKey::DiscNo, "1").unwrap();
        tag.delete_field(FieldKey::DiscTotal).unwrap();
        assert_eq!(tag.get_first_by_id("TPOS"), "1");

        tag.delete_field(FieldKey::DiscNo).unwrap();
        assert!(!tag.has_frame("TPOS"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let tag = Id3v2Tag::new(Id3Version::V23);
        assert!(matches!(tag.create_field(FieldKey::Track, "three"), Err(TagError::InvalidValue(_))));
        assert!(matches!(tag.create_field(FieldKey::Bpm, "fast"), Err(TagError::InvalidValue(_))));
        assert!(matches!(tag.create_field(FieldKey::Year, "soon"), Err(TagError::InvalidValue(_))));
        assert!(matches!(tag.create_field(FieldKey::CoverArt, "x"), Err(TagError::InvalidValue(_))));
        assert!(matches!(tag.create_field(FieldKey::Mood, "calm"), Err(TagError::KeyNotFound(_))));
        assert!(matches!(tag.get_first(FieldKey::Mood), Err(TagError::KeyNotFound(_))));
    }

    #[test]
    fn test_genre_storage() {
        let mut tag = Id3v2Tag::new(Id3Version::V23);
        tag.set_value(FieldKey::Genre, "rock").unwrap();
        assert_eq!(tag.get_first_by_id("TCON"), "(17)");
        assert_eq!(tag.get_first(FieldKey::Genre).unwrap(), "Rock");

        tag.set_value(FieldKey::Genre, "Nerdcore").unwrap();
        assert_eq!(tag.get_first(FieldKey::Genre).unwrap(), "Nerdcore");

        let mut v24 = Id3v2Tag::new(Id3Version::V24);
        v24.set_value(FieldKey::Genre, "Jazz").unwrap();
        assert_eq!(v24.get_first_by_id("TCON"), "8");
        assert_eq!(v24.get_first(FieldKey::Genre).unwrap(), "Jazz");
    }

    #[test]
    fn test_absent_fields_read_empty() {
        let tag = Id3v2Tag::new(Id3Version::V22);
        assert_eq!(tag.get_first(FieldKey::Title).unwrap(), "");
        assert!(tag.get_fields(FieldKey::Comment).unwrap().is_empty());
    }

    #[test]
    fn test_year_per_version() {
        let mut v23 = Id3v2Tag::new(Id3Version::V23);
        v23.set_value(FieldKey::Year, "1999-05-01").unwrap();
        assert_eq!(v23.get_first(FieldKey::Year).unwrap(), "1999");

        let mut v24 = Id3v2Tag::new(Id3Version::V24);
        v24.set_value(FieldKey::Year, "1999-05-01").unwrap();
        assert_eq!(v24.get_first(FieldKey::Year).unwrap(), "1999-05-01");
    }

    #[test]
    fn test_comments_and_artwork() {
        let mut tag = Id3v2Tag::new(Id3Version::V22);
        let first = tag.create_field(FieldKey::Comment, "one").unwrap();
        let second = tag.create_field(FieldKey::Comment, "two").unwrap();
        tag.add_field(first).unwrap();
        tag.add_field(second).unwrap();
        assert_eq!(tag.get_fields(FieldKey::Comment).unwrap().len(), 2);
        assert_eq!(tag.get_first(FieldKey::Comment).unwrap(), "one");

        let artwork = Artwork::from_bytes(vec![0x89, b'P', b'N', b'G', 0, 1]);
        assert_eq!(artwork.extension(), "png");
        let frame = tag.create_artwork_field(&artwork).unwrap();
        assert_eq!(frame.id, "PIC");
        tag.add_field(frame).unwrap();
        assert_eq!(tag.artwork(), vec![artwork]);

        tag.delete_field(FieldKey::Comment).unwrap();
        assert!(tag.get_fields(FieldKey::Comment).unwrap().is_empty());
    }
}
