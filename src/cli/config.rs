// CLI configuration
use super::output::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use tagforge::{FieldKey, Id3Version, PaddingStrategy};

/// tagforge - ID3 tag inspection and editing tool
#[derive(Parser, Debug)]
#[command(name = "tagforge")]
#[command(about = "Read, convert and rewrite ID3 tags in audio files", long_about = None)]
#[command(version)]
#[command(author = "xwsjjctz <xwsjjctz@icloud.com>")]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read generic fields and tag diagnostics
    Read {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump every ID3v2 frame in tag order
    Frames {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Detect which tag a file carries
    Detect {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Show file information
    Info {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Set fields, e.g. `set song.mp3 TITLE=Intro TRACK=1`
    Set {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// KEY=VALUE assignments; an empty value deletes the field
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_assignment)]
        assignments: Vec<(FieldKey, String)>,

        /// Write the tag as this ID3v2 version
        #[arg(long, value_parser = parse_version)]
        to_version: Option<Id3Version>,

        #[command(flatten)]
        padding: PaddingArgs,
    },

    /// Convert the ID3v2 tag to another version
    Convert {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Target version (2.2, 2.3 or 2.4)
        #[arg(long, value_parser = parse_version)]
        to: Id3Version,

        #[command(flatten)]
        padding: PaddingArgs,
    },

    /// Delete the ID3v2 tag
    Delete {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Delete the trailing ID3v1 tag as well
        #[arg(long)]
        v1: bool,
    },

    /// Batch process multiple files
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: PathBuf,

        /// File pattern (e.g., "*.mp3")
        #[arg(short, long, default_value = "*.mp3")]
        pattern: String,

        /// Operation: read or set
        #[arg(value_enum)]
        operation: BatchOperation,

        /// KEY=VALUE assignments for the set operation
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(FieldKey, String)>,
    },

    /// Export cover art
    ExportCover {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output directory for cover images
        #[arg(short, long)]
        output: PathBuf,

        /// Cover index (for files with multiple covers)
        #[arg(short, long)]
        index: Option<usize>,
    },
}

/// Padding to leave when a tag has to grow
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PaddingArgs {
    /// Extra bytes after the frames
    #[arg(long, default_value_t = tagforge::id3::v2::write::TAG_SIZE_INCREMENT, conflicts_with = "doubling")]
    pub padding: u32,

    /// Grow the tag region by doubling from this size instead, 0 starting from the shortfall
    #[arg(long, value_name = "START")]
    pub doubling: Option<u32>,
}

impl PaddingArgs {
    pub fn strategy(&self) -> PaddingStrategy {
        match self.doubling {
            Some(start) => PaddingStrategy::Doubling(start),
            None => PaddingStrategy::Increment(self.padding),
        }
    }
}

/// Batch operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BatchOperation {
    Read,
    Set,
}

impl std::fmt::Display for BatchOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchOperation::Read => write!(f, "read"),
            BatchOperation::Set => write!(f, "set"),
        }
    }
}

impl Config {
    /// Log level from the flags; `RUST_LOG` still overrides it
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Warn
        }
    }
}

fn parse_assignment(value: &str) -> Result<(FieldKey, String), String> {
    let (key, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", value))?;
    let key = key.parse::<FieldKey>().map_err(|e| e.to_string())?;
    Ok((key, value.to_string()))
}

fn parse_version(value: &str) -> Result<Id3Version, String> {
    Id3Version::parse(value).ok_or_else(|| format!("unknown ID3v2 version '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let (key, value) = parse_assignment("album-artist=Various=Artists").unwrap();
        assert_eq!(key, FieldKey::AlbumArtist);
        assert_eq!(value, "Various=Artists");
        assert!(parse_assignment("TITLE").is_err());
        assert!(parse_assignment("NOPE=1").is_err());
    }

    #[test]
    fn test_set_command_line() {
        let config = Config::try_parse_from([
            "tagforge", "-v", "set", "song.mp3", "TITLE=Intro", "TRACK=1", "--to-version", "2.4", "--doubling", "1024",
        ])
        .unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);

        match config.command {
            Commands::Set { assignments, to_version, padding, .. } => {
                assert_eq!(assignments.len(), 2);
                assert_eq!(to_version, Some(Id3Version::V24));
                assert_eq!(padding.strategy(), PaddingStrategy::Doubling(1024));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_padding_conflict_rejected() {
        let result = Config::try_parse_from(["tagforge", "convert", "a.mp3", "--to", "2.3", "--padding", "10", "--doubling", "64"]);
        assert!(result.is_err());
    }
}
