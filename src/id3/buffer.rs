// In-memory view of an MP3 file: [ID3v2 tag][audio][ID3v1 tag]

use super::v1::Id3v1Tag;
use super::v2::{Id3v2Header, Id3v2Tag};
use crate::error::Result;
use log::debug;
use std::io::Write;
use std::ops::Range;

/// A whole file held in memory, split into its tags and the audio between them
#[derive(Debug, Clone)]
pub struct Mp3Buffer {
    data: Vec<u8>,
    audio: Range<usize>,
    id3v2: Option<Id3v2Tag>,
    id3v1: Option<Id3v1Tag>,
}

impl Mp3Buffer {
    /// Split `data` into tags and audio
    ///
    /// Fails only when the data starts with `ID3` but the header can't be read.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let id3v1 = Id3v1Tag::read_from_slice(&data);
        let end = match id3v1 {
            Some(_) => data.len() - Id3v1Tag::TAG_SIZE,
            None => data.len(),
        };

        let id3v2 = if data.starts_with(&Id3v2Header::ID) {
            Some(Id3v2Tag::parse(&data[..end])?)
        } else {
            None
        };
        let start = id3v2
            .as_ref()
            .map_or(0, |tag| tag.diagnostics().file_read_size as usize)
            .min(end);

        debug!("Buffer of {} bytes, audio at {}..{}", data.len(), start, end);
        Ok(Mp3Buffer { data, audio: start..end, id3v2, id3v1 })
    }

    pub fn audio(&self) -> &[u8] {
        &self.data[self.audio.clone()]
    }

    pub fn id3v2(&self) -> Option<&Id3v2Tag> {
        self.id3v2.as_ref()
    }

    pub fn id3v1(&self) -> Option<&Id3v1Tag> {
        self.id3v1.as_ref()
    }

    pub fn set_id3v2(&mut self, tag: Option<Id3v2Tag>) {
        self.id3v2 = tag;
    }

    pub fn set_id3v1(&mut self, tag: Option<Id3v1Tag>) {
        self.id3v1 = tag;
    }

    /// Write the tags and audio out again, the ID3v2 tag without padding
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        if let Some(tag) = &self.id3v2 {
            writer.write_all(&tag.to_bytes(0)?)?;
        }
        writer.write_all(self.audio())?;
        if let Some(tag) = &self.id3v1 {
            writer.write_all(&tag.to_bytes())?;
        }
        Ok(())
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.data.len());
        self.write(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::v1::tests::sample_tag;
    use crate::id3::v2::{Frame, Id3Version};

    const AUDIO: &[u8] = b"\xFF\xFB\x90\x64frame data";

    fn tagged_file(padding: usize) -> Vec<u8> {
        let mut tag = Id3v2Tag::new(Id3Version::V23);
        tag.set_frame(Frame::text("TIT2", "Song")).unwrap();
        let mut bytes = tag.to_bytes(padding).unwrap();
        bytes.extend_from_slice(AUDIO);
        bytes.extend(sample_tag());
        bytes
    }

    #[test]
    fn test_carves_both_tags() {
        let buffer = Mp3Buffer::from_bytes(tagged_file(20)).unwrap();
        assert_eq!(buffer.audio(), AUDIO);
        assert_eq!(buffer.id3v2().unwrap().first_frame("TIT2").unwrap().content(), "Song");
        assert_eq!(buffer.id3v1().unwrap().artist, "Artist");
    }

    #[test]
    fn test_untagged_audio() {
        let buffer = Mp3Buffer::from_bytes(AUDIO.to_vec()).unwrap();
        assert!(buffer.id3v2().is_none());
        assert!(buffer.id3v1().is_none());
        assert_eq!(buffer.audio(), AUDIO);
    }

    #[test]
    fn test_write_drops_padding() {
        let mut buffer = Mp3Buffer::from_bytes(tagged_file(20)).unwrap();
        buffer.set_id3v1(None);
        let out = buffer.into_bytes().unwrap();

        assert_eq!(out, {
            let mut expected = tagged_file(0);
            expected.truncate(expected.len() - Id3v1Tag::TAG_SIZE);
            expected
        });
    }

    #[test]
    fn test_bad_header_is_an_error() {
        let mut data = b"ID3\x07\x00\x00\x00\x00\x00\x10".to_vec();
        data.extend_from_slice(AUDIO);
        assert!(Mp3Buffer::from_bytes(data).is_err());
    }
}
