// Shared helpers: text encodings, synchsafe integers, byte and file I/O
pub mod encoding;
pub mod io;
pub mod synchsafe;
