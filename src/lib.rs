//! tagforge: an ID3v2 tag engine
//!
//! Reads ID3v2.2/2.3/2.4 tags into a frame map, converts them between
//! versions, exposes them through generic field keys and writes them back
//! without disturbing the audio that follows.

use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub mod field_mapping;
pub mod id3;
pub mod utils;

pub use error::{Result, TagError};
pub use field_mapping::{FieldKey, NumberPair, TagFields};
pub use id3::v2::fields::Artwork;
pub use id3::v2::{Diagnostics, Frame, FrameBody, Id3v2Header, PaddingStrategy, WriteOptions};
pub use id3::{Id3Version, Id3v1Tag, Id3v2Tag, Mp3Buffer};

use id3::v2::write;

/// Which tag a file carries, ID3v2 taking precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Id3v2,
    Id3v1,
    Unknown,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Id3v2 => write!(f, "id3v2"),
            FileType::Id3v1 => write!(f, "id3v1"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Audio file metadata handler
#[derive(Debug, Clone)]
pub struct AudioFile {
    path: PathBuf,
    file_type: FileType,
}

impl AudioFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_type = Self::detect_file_type(&path)?;
        debug!("{} detected as {}", path.display(), file_type);
        Ok(AudioFile { path, file_type })
    }

    /// Detect file type from the leading `ID3` marker or the trailing `TAG` block
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        if utils::io::check_signature(&mut file, &Id3v2Header::ID)? {
            return Ok(FileType::Id3v2);
        }
        if Id3v1Tag::read_from_file(path)?.is_some() {
            return Ok(FileType::Id3v1);
        }
        Ok(FileType::Unknown)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Tag version as "2.3", "1.1" and so on
    pub fn version(&self) -> Result<Option<String>> {
        let version = match self.file_type {
            FileType::Id3v2 => self.read_id3v2()?.map(|tag| tag.version().to_string()),
            FileType::Id3v1 => self
                .read_id3v1()?
                .map(|tag| if tag.track.is_some() { "1.1" } else { "1.0" }.to_string()),
            FileType::Unknown => None,
        };
        Ok(version)
    }

    pub fn read_id3v2(&self) -> Result<Option<Id3v2Tag>> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        Id3v2Tag::read(&mut reader)
    }

    pub fn read_id3v1(&self) -> Result<Option<Id3v1Tag>> {
        Id3v1Tag::read_from_file(&self.path)
    }

    /// Tag to edit: the ID3v2 tag, else one built from the ID3v1 tag, else an empty one
    pub fn editable_tag(&self, version: Id3Version) -> Result<Id3v2Tag> {
        if let Some(tag) = self.read_id3v2()? {
            return Ok(tag);
        }
        Ok(match self.read_id3v1()? {
            Some(v1) => v1.to_v2(version),
            None => Id3v2Tag::new(version),
        })
    }

    /// Generic fields of whichever tag the file carries, read fresh from disk
    pub fn metadata(&self) -> Result<Metadata> {
        let (file_type, version, tag, diagnostics) = match self.read_id3v2()? {
            Some(tag) => {
                let diagnostics = tag.diagnostics().clone();
                (FileType::Id3v2, Some(tag.version().to_string()), Some(tag), Some(diagnostics))
            }
            None => match self.read_id3v1()? {
                Some(v1) => {
                    let version = if v1.track.is_some() { "1.1" } else { "1.0" };
                    (FileType::Id3v1, Some(version.to_string()), Some(v1.to_v2(Id3Version::V24)), None)
                }
                None => (FileType::Unknown, None, None, None),
            },
        };

        let mut fields = BTreeMap::new();
        let mut covers = 0;
        if let Some(tag) = &tag {
            for key in FieldKey::ALL {
                if key == FieldKey::CoverArt {
                    continue;
                }
                // Keys with no frame in this version are simply absent
                if let Ok(value) = tag.get_first(key) {
                    if !value.is_empty() {
                        fields.insert(key.as_str().to_string(), value);
                    }
                }
            }
            covers = tag.artwork().len();
        }

        Ok(Metadata { file_type, version, fields, covers, diagnostics })
    }

    pub fn save_id3v2(&self, tag: &Id3v2Tag, options: &WriteOptions) -> Result<()> {
        write::write_tag(&self.path, tag, options)
    }

    pub fn delete_id3v2(&self) -> Result<bool> {
        write::delete_tag(&self.path)
    }

    pub fn delete_id3v1(&self) -> Result<bool> {
        Id3v1Tag::delete_from_file(&self.path)
    }
}

/// Serializable summary of a file's tag
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub file_type: FileType,
    pub version: Option<String>,
    pub fields: BTreeMap<String, String>,
    pub covers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::v1::tests::sample_tag;
    use std::fs;
    use tempfile::tempdir;

    const AUDIO: &[u8] = b"\xFF\xFB\x90\x64some audio";

    #[test]
    fn test_detect_file_types() {
        let dir = tempdir().unwrap();

        let bare = dir.path().join("bare.mp3");
        fs::write(&bare, AUDIO).unwrap();
        assert_eq!(AudioFile::open(&bare).unwrap().file_type(), FileType::Unknown);

        let v1 = dir.path().join("v1.mp3");
        let mut bytes = AUDIO.to_vec();
        bytes.extend(sample_tag());
        fs::write(&v1, &bytes).unwrap();
        let file = AudioFile::open(&v1).unwrap();
        assert_eq!(file.file_type(), FileType::Id3v1);
        assert_eq!(file.version().unwrap().as_deref(), Some("1.1"));

        let mut tag = Id3v2Tag::new(Id3Version::V23);
        tag.set_value(FieldKey::Title, "Tagged").unwrap();
        file.save_id3v2(&tag, &WriteOptions::default()).unwrap();
        let file = AudioFile::open(&v1).unwrap();
        assert_eq!(file.file_type(), FileType::Id3v2);
        assert_eq!(file.version().unwrap().as_deref(), Some("2.3"));
    }

    #[test]
    fn test_metadata_falls_back_to_id3v1() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("v1.mp3");
        let mut bytes = AUDIO.to_vec();
        bytes.extend(sample_tag());
        fs::write(&path, &bytes).unwrap();

        let metadata = AudioFile::open(&path).unwrap().metadata().unwrap();
        assert_eq!(metadata.fields["TITLE"], "Title");
        assert_eq!(metadata.fields["GENRE"], "Rock");
        assert!(metadata.diagnostics.is_none());

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["file_type"], "id3v1");
    }

    #[test]
    fn test_edit_and_delete_both_tags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        let mut bytes = AUDIO.to_vec();
        bytes.extend(sample_tag());
        fs::write(&path, &bytes).unwrap();

        let file = AudioFile::open(&path).unwrap();
        let mut tag = file.editable_tag(Id3Version::V24).unwrap();
        tag.set_value(FieldKey::Artist, "Someone Else").unwrap();
        file.save_id3v2(&tag, &WriteOptions::default()).unwrap();

        let metadata = file.metadata().unwrap();
        assert_eq!(metadata.fields["ARTIST"], "Someone Else");
        assert_eq!(metadata.fields["ALBUM"], "Album");
        assert_eq!(metadata.file_type, FileType::Id3v2);
        assert!(metadata.diagnostics.is_some());

        assert!(file.delete_id3v2().unwrap());
        assert!(file.delete_id3v1().unwrap());
        assert_eq!(AudioFile::detect_file_type(&path).unwrap(), FileType::Unknown);
    }
}
