// ID3 tag handling: the ID3v2 frame engine, the trailing ID3v1 tag and the genre table
pub mod buffer;
pub mod genres;
pub mod v1;
pub mod v2;

pub use buffer::Mp3Buffer;
pub use v1::Id3v1Tag;
pub use v2::{Id3Version, Id3v2Tag};
