// Error types shared by the tag engine

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, TagError>;

/// Errors surfaced to callers of the tag engine
///
/// Problems with individual frames never show up here: they are recorded in
/// the tag's diagnostics instead so that the rest of the tag still loads.
#[derive(Debug, Error)]
pub enum TagError {
    /// The buffer does not start with the expected `ID3` marker and version
    #[error("tag header mismatch: {0}")]
    TagHeaderMismatch(String),

    /// A size field could not be decoded or encoded
    #[error("malformed size: {0}")]
    MalformedSize(String),

    /// The generic key is unknown or has no native field in this tag
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The value cannot be stored in the target frame body
    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
