// CLI command implementations
use super::config::{BatchOperation, Commands, Config};
use super::output::OutputFormatter;
use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tagforge::id3::v2::BodyKind;
use tagforge::{AudioFile, FieldKey, FileType, Id3Version, Id3v2Tag, PaddingStrategy, TagFields, WriteOptions};

/// Run the parsed command line
pub fn run(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    match &config.command {
        Commands::Read { files, output } => command_read(files, output.as_deref(), formatter),
        Commands::Frames { file } => command_frames(file, formatter),
        Commands::Detect { files } => command_detect(files, formatter),
        Commands::Info { files } => command_info(files, formatter),
        Commands::Set { file, assignments, to_version, padding } => {
            let options = WriteOptions {
                padding: padding.strategy(),
                target_version: *to_version,
                ..WriteOptions::default()
            };
            set_fields(file, assignments, &options)?;
            formatter.print_success(&format!("Updated {}", file.display()));
            Ok(())
        }
        Commands::Convert { files, to, padding } => command_convert(files, *to, padding.strategy(), formatter),
        Commands::Delete { files, v1 } => command_delete(files, *v1, formatter),
        Commands::Batch { directory, pattern, operation, assignments } => {
            command_batch(directory, pattern, *operation, assignments, formatter)
        }
        Commands::ExportCover { file, output, index } => command_export_cover(file, output, *index, formatter),
    }
}

/// Read metadata from files
fn command_read(files: &[PathBuf], output: Option<&Path>, formatter: &OutputFormatter) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };

    for path in files {
        match AudioFile::open(path).and_then(|audio| audio.metadata()) {
            Ok(metadata) => formatter.output(&metadata, &mut writer)?,
            Err(e) => formatter.print_error(&format!("{}: {}", path.display(), e)),
        }
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct FrameDump {
    id: String,
    flags: u16,
    kind: BodyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'static str>,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Base64 payload of binary and unsupported bodies
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

#[derive(Serialize)]
struct TagDump<'a> {
    version: String,
    frames: Vec<FrameDump>,
    diagnostics: &'a tagforge::Diagnostics,
}

fn dump_tag(tag: &Id3v2Tag) -> TagDump<'_> {
    let frames = tag
        .iter()
        .map(|frame| {
            let binary = matches!(frame.body.kind(), BodyKind::Binary | BodyKind::Unsupported);
            FrameDump {
                id: frame.id.clone(),
                flags: frame.flags,
                kind: frame.body.kind(),
                description: tag.registry().lookup(&frame.id).map(|spec| spec.description),
                size: frame.size(tag.version()),
                text: (!binary).then(|| frame.content()),
                data: binary.then(|| BASE64.encode(frame.body.to_bytes(tag.version()))),
            }
        })
        .collect();
    TagDump { version: tag.version().to_string(), frames, diagnostics: tag.diagnostics() }
}

/// Dump the frame index of one file
fn command_frames(path: &Path, formatter: &OutputFormatter) -> Result<()> {
    let audio = AudioFile::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let tag = audio
        .read_id3v2()?
        .ok_or_else(|| anyhow!("{} has no ID3v2 tag", path.display()))?;
    formatter.output(&dump_tag(&tag), &mut io::stdout())
}

/// Detect file format
fn command_detect(files: &[PathBuf], formatter: &OutputFormatter) -> Result<()> {
    for path in files {
        match AudioFile::open(path) {
            Ok(audio) => {
                let version = audio.version().ok().flatten().unwrap_or_else(|| "N/A".to_string());
                println!("{}: {} (version: {})", path.display(), audio.file_type(), version);
            }
            Err(e) => formatter.print_error(&format!("{}: {}", path.display(), e)),
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct FileInfo {
    path: String,
    size: u64,
    modified: Option<String>,
    file_type: FileType,
    version: Option<String>,
    tag_size: u64,
}

/// Show file size, modification time and tag layout
fn command_info(files: &[PathBuf], formatter: &OutputFormatter) -> Result<()> {
    for path in files {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
                continue;
            }
        };
        let audio = AudioFile::open(path)?;
        let modified = metadata
            .modified()
            .ok()
            .map(|mtime| DateTime::<Local>::from(mtime).format("%Y-%m-%d %H:%M:%S").to_string());

        let info = FileInfo {
            path: path.display().to_string(),
            size: metadata.len(),
            modified,
            file_type: audio.file_type(),
            version: audio.version()?,
            tag_size: tagforge::id3::v2::existing_tag_size(path)?,
        };
        formatter.output(&info, &mut io::stdout())?;
    }
    Ok(())
}

/// Apply assignments to the file's tag and write it back
fn set_fields(path: &Path, assignments: &[(FieldKey, String)], options: &WriteOptions) -> Result<()> {
    let audio = AudioFile::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut tag = audio.editable_tag(options.target_version.unwrap_or(Id3Version::V23))?;

    for (key, value) in assignments {
        if value.is_empty() {
            tag.delete_field(*key)?;
            continue;
        }
        match key {
            FieldKey::CoverArt => {
                let data = fs::read(value).with_context(|| format!("Failed to read cover image {}", value))?;
                let frame = tag.create_artwork_field(&tagforge::Artwork::from_bytes(data))?;
                tag.set_field(frame)?;
            }
            _ => tag.set_value(*key, value).with_context(|| format!("Cannot set {}", key))?,
        }
        debug!("Set {} on {}", key, path.display());
    }

    audio
        .save_id3v2(&tag, options)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn command_convert(files: &[PathBuf], to: Id3Version, padding: PaddingStrategy, formatter: &OutputFormatter) -> Result<()> {
    let options = WriteOptions { padding, target_version: Some(to), ..WriteOptions::default() };
    for path in files {
        let audio = AudioFile::open(path)?;
        let Some(tag) = audio.read_id3v2()? else {
            formatter.print_error(&format!("{}: no ID3v2 tag", path.display()));
            continue;
        };

        let converted = tag.convert(to);
        for id in &converted.diagnostics().discarded_frame_ids {
            warn!("{}: {} dropped converting to ID3v{}", path.display(), id, to);
        }
        audio.save_id3v2(&converted, &options)?;
        formatter.print_success(&format!("{}: ID3v{} -> ID3v{}", path.display(), tag.version(), to));
    }
    Ok(())
}

fn command_delete(files: &[PathBuf], v1: bool, formatter: &OutputFormatter) -> Result<()> {
    for path in files {
        let audio = AudioFile::open(path)?;
        let mut removed = Vec::new();
        if audio.delete_id3v2()? {
            removed.push("ID3v2");
        }
        if v1 && audio.delete_id3v1()? {
            removed.push("ID3v1");
        }

        if removed.is_empty() {
            formatter.print_info(&format!("{}: nothing to delete", path.display()));
        } else {
            formatter.print_success(&format!("{}: removed {}", path.display(), removed.join(", ")));
        }
    }
    Ok(())
}

/// Batch process directory
fn command_batch(
    directory: &Path,
    pattern: &str,
    operation: BatchOperation,
    assignments: &[(FieldKey, String)],
    formatter: &OutputFormatter,
) -> Result<()> {
    if operation == BatchOperation::Set && assignments.is_empty() {
        bail!("The set operation needs at least one --set KEY=VALUE");
    }

    // Bare file names match anywhere below the directory
    let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
        format!("{}/{}", directory.display(), pattern)
    } else {
        format!("{}/**/{}", directory.display(), pattern)
    };

    let mut files = Vec::new();
    for entry in glob::glob(&glob_pattern).with_context(|| format!("Invalid glob pattern {}", glob_pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => formatter.print_error(&format!("Error reading path: {}", e)),
        }
    }

    if files.is_empty() {
        formatter.print_info("No files found matching pattern");
        return Ok(());
    }
    formatter.print_info(&format!("Processing {} files ({})...", files.len(), operation));

    let mut success_count = 0;
    let mut error_count = 0;
    let mut stdout = io::stdout();
    for path in &files {
        let result = match operation {
            BatchOperation::Read => AudioFile::open(path)
                .and_then(|audio| audio.metadata())
                .map_err(anyhow::Error::from)
                .and_then(|metadata| formatter.output(&metadata, &mut stdout)),
            BatchOperation::Set => set_fields(path, assignments, &WriteOptions::default()),
        };

        match result {
            Ok(()) => {
                success_count += 1;
                if operation == BatchOperation::Set {
                    formatter.print_success(&path.display().to_string());
                }
            }
            Err(e) => {
                error_count += 1;
                formatter.print_error(&format!("{}: {:#}", path.display(), e));
            }
        }
    }

    formatter.print_info(&format!("Completed: {} successful, {} errors", success_count, error_count));
    Ok(())
}

/// Export cover art
fn command_export_cover(file: &Path, output_dir: &Path, index: Option<usize>, formatter: &OutputFormatter) -> Result<()> {
    let audio = AudioFile::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let artwork = audio.read_id3v2()?.map(|tag| tag.artwork()).unwrap_or_default();
    if artwork.is_empty() {
        bail!("{} has no cover art", file.display());
    }

    let selected: Vec<_> = match index {
        Some(i) => vec![(i, artwork.get(i).ok_or_else(|| anyhow!("No cover at index {} ({} found)", i, artwork.len()))?)],
        None => artwork.iter().enumerate().collect(),
    };

    fs::create_dir_all(output_dir)?;
    let stem = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "cover".to_string());
    for (i, picture) in selected {
        let target = output_dir.join(format!("{}_cover_{}.{}", stem, i, picture.extension()));
        fs::write(&target, &picture.data).with_context(|| format!("Failed to write {}", target.display()))?;
        formatter.print_success(&format!("Exported {}", target.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagforge::{Frame, FrameBody};
    use tempfile::tempdir;

    const AUDIO: &[u8] = b"\xFF\xFB\x90\x64audio";

    #[test]
    fn test_set_fields_creates_tag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        fs::write(&path, AUDIO).unwrap();

        let assignments = vec![
            (FieldKey::Title, "Intro".to_string()),
            (FieldKey::Track, "3".to_string()),
            (FieldKey::TrackTotal, "12".to_string()),
        ];
        set_fields(&path, &assignments, &WriteOptions::default()).unwrap();

        let tag = AudioFile::open(&path).unwrap().read_id3v2().unwrap().unwrap();
        assert_eq!(tag.version(), Id3Version::V23);
        assert_eq!(tag.get_first(FieldKey::Title).unwrap(), "Intro");
        assert_eq!(tag.first_frame("TRCK").unwrap().content(), "3/12");

        set_fields(&path, &[(FieldKey::Title, String::new())], &WriteOptions::default()).unwrap();
        let tag = AudioFile::open(&path).unwrap().read_id3v2().unwrap().unwrap();
        assert!(!tag.has_frame("TIT2"));
    }

    #[test]
    fn test_dump_encodes_binary_bodies() {
        let mut tag = Id3v2Tag::new(Id3Version::V24);
        tag.set_frame(Frame::text("TIT2", "Song")).unwrap();
        tag.add_frame(Frame::new("PRIV", FrameBody::Binary(b"owner\0data".to_vec()))).unwrap();

        let dump = serde_json::to_value(dump_tag(&tag)).unwrap();
        assert_eq!(dump["version"], "2.4");
        assert_eq!(dump["frames"][0]["text"], "Song");
        assert_eq!(dump["frames"][0]["description"], "Title/songname/content description");
        assert_eq!(dump["frames"][1]["description"], "Private frame");
        assert_eq!(dump["frames"][1]["data"], BASE64.encode(b"owner\0data"));
        assert!(dump["frames"][1].get("text").is_none());
    }

    #[test]
    fn test_export_cover() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        fs::write(&path, AUDIO).unwrap();

        let image = dir.path().join("front.png");
        fs::write(&image, b"\x89PNG\r\n\x1a\nimage").unwrap();
        set_fields(&path, &[(FieldKey::CoverArt, image.display().to_string())], &WriteOptions::default()).unwrap();

        let out = dir.path().join("covers");
        let formatter = OutputFormatter::new(Default::default(), true);
        command_export_cover(&path, &out, None, &formatter).unwrap();
        assert_eq!(fs::read(out.join("song_cover_0.png")).unwrap(), b"\x89PNG\r\n\x1a\nimage");
        assert!(command_export_cover(&path, &out, Some(4), &formatter).is_err());
    }
}
