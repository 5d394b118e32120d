// Writing tags back to audio files
//
// A tag that fits in the space the old one occupied is written over it. A
// larger tag means the file is rebuilt next to the original and renamed over
// it, so a failure at any point leaves the original untouched.

use super::header::{Id3Version, Id3v2Header};
use super::Id3v2Tag;
use crate::error::{Result, TagError};
use crate::utils::io;
use log::{debug, info};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Padding added after the frames when a tag has to grow
pub const TAG_SIZE_INCREMENT: u32 = 100;

/// How much room to leave when the tag region has to grow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaddingStrategy {
    /// The tag plus a fixed number of bytes
    Increment(u32),
    /// Start at the given size, or at the shortfall when zero, and double until the tag fits
    Doubling(u32),
}

impl Default for PaddingStrategy {
    fn default() -> Self {
        PaddingStrategy::Increment(TAG_SIZE_INCREMENT)
    }
}

impl PaddingStrategy {
    /// Size of the tag region for a tag needing `required` bytes where `existing` are available
    pub fn region_size(self, required: u64, existing: u64) -> u64 {
        match self {
            PaddingStrategy::Increment(extra) => required + extra as u64,
            PaddingStrategy::Doubling(start) => {
                let seed = match start {
                    0 => required.saturating_sub(existing),
                    start => start as u64,
                };
                let mut size = seed.max(1);
                while size < required {
                    size *= 2;
                }
                size
            }
        }
    }
}

/// Options for `write_tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteOptions {
    pub padding: PaddingStrategy,
    /// Convert the tag before writing
    pub target_version: Option<Id3Version>,
    pub preserve_modified_time: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            padding: PaddingStrategy::default(),
            target_version: None,
            preserve_modified_time: true,
        }
    }
}

/// Bytes taken by the ID3v2 tag at the start of the file, 0 if there is none
pub fn existing_tag_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let mut file = File::open(path)?;
    let prefix = io::read_prefix(&mut file, Id3v2Header::HEADER_SIZE)?;
    match Id3v2Header::parse(&prefix) {
        Ok(header) => Ok(header.total_size()),
        Err(TagError::TagHeaderMismatch(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Write `tag` to the start of the file at `path`, replacing any existing ID3v2 tag
pub fn write_tag<P: AsRef<Path>>(path: P, tag: &Id3v2Tag, options: &WriteOptions) -> Result<()> {
    let path = path.as_ref();
    let tag = match options.target_version {
        Some(version) if version != tag.version() => Cow::Owned(tag.convert(version)),
        _ => Cow::Borrowed(tag),
    };

    let required = tag.size() as u64;
    let existing = existing_tag_size(path)?;
    let modified = fs::metadata(path)?.modified()?;

    if existing > 0 && required <= existing {
        let bytes = tag.to_bytes((existing - required) as usize)?;
        let mut file = OpenOptions::new().write(true).open(path)?;
        file.write_all(&bytes)?;
        if options.preserve_modified_time {
            file.set_modified(modified)?;
        }
        file.sync_all()?;
        info!("Wrote {} byte ID3v{} tag in place to {}", bytes.len(), tag.version(), path.display());
        return Ok(());
    }

    let region = options.padding.region_size(required, existing);
    debug!("Tag needs {} bytes, {} available, growing region to {}", required, existing, region);
    let bytes = tag.to_bytes((region - required) as usize)?;
    replace_contents(path, options.preserve_modified_time.then_some(modified), |source, writer| {
        writer.write_all(&bytes)?;
        io::copy_from_offset(source, existing, writer)?;
        Ok(())
    })?;
    info!("Rewrote {} with a {} byte ID3v{} tag", path.display(), bytes.len(), tag.version());
    Ok(())
}

/// Build new contents for `path` in a temporary file beside it and move that into place
///
/// `fill` reads the original file and writes the replacement. If it fails the
/// original is left as it was and the temporary file is removed.
fn replace_contents<F>(path: &Path, modified: Option<std::time::SystemTime>, fill: F) -> Result<()>
where
    F: FnOnce(&mut File, &mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    // Dropping the temp file on an early return removes it
    let mut temp = tempfile::Builder::new().prefix(".tagforge-").tempfile_in(dir)?;
    {
        let mut source = File::open(path)?;
        let mut writer = BufWriter::new(temp.as_file_mut());
        fill(&mut source, &mut writer)?;
        writer.flush()?;
    }

    let file = temp.as_file();
    file.set_permissions(permissions)?;
    if let Some(modified) = modified {
        file.set_modified(modified)?;
    }
    file.sync_all()?;

    temp.persist(path).map_err(|e| TagError::Io(e.error))?;
    Ok(())
}

/// Blank the `ID3` marker of the tag at the start of the file
///
/// The rest of the tag stays in place as filler. Returns whether a tag was found.
pub fn delete_tag<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let mut prefix = [0u8; Id3v2Header::HEADER_SIZE];
    let found = match file.read_exact(&mut prefix) {
        Ok(()) => Id3v2Header::parse(&prefix).is_ok(),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e.into()),
    };

    if found {
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&[0u8; 3])?;
        file.sync_all()?;
        info!("Deleted ID3v2 tag from {}", path.display());
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::v2::body::FrameBody;
    use crate::id3::v2::frame::Frame;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    const AUDIO: &[u8] = b"\xFF\xFB\x90\x64audio frames follow here\x00\x01\x02";

    fn small_tag() -> Id3v2Tag {
        let mut tag = Id3v2Tag::new(Id3Version::V23);
        tag.set_frame(Frame::text("TIT2", "Old")).unwrap();
        tag
    }

    /// File with a 50 byte tag region followed by `AUDIO`
    fn write_fixture(path: &Path) -> SystemTime {
        let tag = small_tag();
        let mut bytes = tag.to_bytes(50 - tag.size()).unwrap();
        assert_eq!(bytes.len(), 50);
        bytes.extend_from_slice(AUDIO);
        fs::write(path, &bytes).unwrap();

        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        File::options().write(true).open(path).unwrap().set_modified(mtime).unwrap();
        mtime
    }

    fn audio_after_tag(path: &Path) -> Vec<u8> {
        let start = existing_tag_size(path).unwrap() as usize;
        fs::read(path).unwrap()[start..].to_vec()
    }

    #[test]
    fn test_padding_strategies() {
        assert_eq!(PaddingStrategy::Increment(100).region_size(500, 50), 600);
        assert_eq!(PaddingStrategy::Doubling(0).region_size(500, 50), 900);
        assert_eq!(PaddingStrategy::Doubling(0).region_size(500, 0), 500);
        assert_eq!(PaddingStrategy::Doubling(0).region_size(500, 300), 800);
        assert_eq!(PaddingStrategy::Doubling(64).region_size(500, 50), 512);
        assert_eq!(PaddingStrategy::Doubling(1024).region_size(500, 50), 1024);
    }

    #[test]
    fn test_growing_tag_keeps_audio_and_mtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        let mtime = write_fixture(&path);
        assert_eq!(existing_tag_size(&path).unwrap(), 50);

        let mut tag = small_tag();
        tag.set_frame(Frame::new("PRIV", FrameBody::Binary(vec![0x42; 480]))).unwrap();
        assert_eq!(tag.size(), 10 + 14 + 490);

        write_tag(&path, &tag, &WriteOptions::default()).unwrap();

        assert_eq!(existing_tag_size(&path).unwrap(), tag.size() as u64 + 100);
        assert_eq!(audio_after_tag(&path), AUDIO);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), mtime);

        let reread = Id3v2Tag::read_from_path(&path).unwrap().unwrap();
        assert_eq!(reread.frames(), tag.frames());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_smaller_tag_written_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        write_fixture(&path);
        let original_len = fs::metadata(&path).unwrap().len();

        let mut tag = Id3v2Tag::new(Id3Version::V24);
        tag.set_frame(Frame::text("TIT2", "New")).unwrap();
        write_tag(&path, &tag, &WriteOptions::default()).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), original_len);
        assert_eq!(audio_after_tag(&path), AUDIO);
        let reread = Id3v2Tag::read_from_path(&path).unwrap().unwrap();
        assert_eq!(reread.version(), Id3Version::V24);
        assert_eq!(reread.first_frame("TIT2").unwrap().content(), "New");
    }

    #[test]
    fn test_tag_added_to_untagged_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.mp3");
        fs::write(&path, AUDIO).unwrap();

        let options = WriteOptions { target_version: Some(Id3Version::V24), ..WriteOptions::default() };
        write_tag(&path, &small_tag(), &options).unwrap();

        assert_eq!(audio_after_tag(&path), AUDIO);
        let reread = Id3v2Tag::read_from_path(&path).unwrap().unwrap();
        assert_eq!(reread.version(), Id3Version::V24);
    }

    #[test]
    fn test_doubling_grows_from_shortfall() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        write_fixture(&path);

        let mut tag = small_tag();
        tag.set_frame(Frame::new("PRIV", FrameBody::Binary(vec![0x42; 480]))).unwrap();
        let options = WriteOptions { padding: PaddingStrategy::Doubling(0), ..WriteOptions::default() };
        write_tag(&path, &tag, &options).unwrap();

        let shortfall = tag.size() as u64 - 50;
        assert_eq!(existing_tag_size(&path).unwrap(), shortfall * 2);
        assert_eq!(audio_after_tag(&path), AUDIO);
    }

    #[test]
    fn test_failed_write_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        let mtime = write_fixture(&path);
        let before = fs::read(&path).unwrap();

        let result = replace_contents(&path, Some(mtime), |source, writer| {
            writer.write_all(b"ID3 partial")?;
            io::copy_from_offset(source, 10, writer)?;
            Err(TagError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
        });
        assert!(matches!(result, Err(TagError::Io(_))));

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), mtime);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().starts_with(".tagforge-"))
            .collect();
        assert!(leftovers.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_delete_blanks_marker_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        write_fixture(&path);
        let before = fs::read(&path).unwrap();

        assert!(delete_tag(&path).unwrap());
        let after = fs::read(&path).unwrap();
        assert_eq!(&after[..3], &[0, 0, 0]);
        assert_eq!(&after[3..], &before[3..]);
        assert_eq!(existing_tag_size(&path).unwrap(), 0);
        assert!(!delete_tag(&path).unwrap());
    }
}
