// I/O utilities for reading and rewriting audio files

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Big-endian 24-bit integer from the first three bytes
pub fn be_u24(bytes: &[u8]) -> u32 {
    ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32)
}

/// Big-endian 32-bit integer from the first four bytes
pub fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read up to `len` bytes from the start of the reader
///
/// Short files yield a shorter buffer rather than an error.
pub fn read_prefix<R: Read + Seek>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(0))?;
    let mut buffer = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Check if the reader has `signature` at its current position, leaving the position unchanged
pub fn check_signature<R: Read + Seek>(reader: &mut R, signature: &[u8]) -> io::Result<bool> {
    let pos = reader.stream_position()?;
    let mut buffer = vec![0u8; signature.len()];
    let matched = match reader.read_exact(&mut buffer) {
        Ok(()) => buffer == signature,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e),
    };
    reader.seek(SeekFrom::Start(pos))?;
    Ok(matched)
}

/// Copy everything from `offset` to the end of `reader` into `writer`
pub fn copy_from_offset<R: Read + Seek, W: Write>(
    reader: &mut R,
    offset: u64,
    writer: &mut W,
) -> io::Result<u64> {
    reader.seek(SeekFrom::Start(offset))?;
    io::copy(reader, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_integers() {
        assert_eq!(be_u24(&[0x01, 0x02, 0x03]), 0x010203);
        assert_eq!(be_u32(&[0x00, 0x00, 0x01, 0x00]), 256);
    }

    #[test]
    fn test_check_signature_keeps_position() {
        let mut cursor = Cursor::new(b"ID3\x03".to_vec());
        assert!(check_signature(&mut cursor, b"ID3").unwrap());
        assert_eq!(cursor.position(), 0);
        assert!(!check_signature(&mut cursor, b"TAG").unwrap());
        assert!(!check_signature(&mut cursor, b"ID3\x03\x00").unwrap());
    }

    #[test]
    fn test_copy_from_offset() {
        let mut cursor = Cursor::new(b"headeraudio".to_vec());
        let mut out = Vec::new();
        assert_eq!(copy_from_offset(&mut cursor, 6, &mut out).unwrap(), 5);
        assert_eq!(out, b"audio");
    }
}
