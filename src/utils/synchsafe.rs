// Synchsafe integer codec
//
// ID3v2.3/2.4 store the tag size (and v2.4 frame sizes) as 28-bit values
// spread over four bytes, seven bits per byte, so the encoded size can never
// look like an MPEG sync marker.

use crate::error::{Result, TagError};

/// Largest value a 4-byte synchsafe integer can carry (2^28 - 1)
pub const MAX_SYNCHSAFE: u32 = 0x0FFF_FFFF;

/// Decode a synchsafe integer from the first four bytes of `bytes`
///
/// The top bit of each byte is ignored.
pub fn decode(bytes: &[u8]) -> Result<u32> {
    if bytes.len() < 4 {
        return Err(TagError::MalformedSize(format!(
            "synchsafe integer needs 4 bytes, got {}",
            bytes.len()
        )));
    }

    Ok(((bytes[0] as u32 & 0x7F) << 21)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | (bytes[3] as u32 & 0x7F))
}

/// Encode `value` as a synchsafe integer
pub fn encode(value: u32) -> Result<[u8; 4]> {
    if value > MAX_SYNCHSAFE {
        return Err(TagError::MalformedSize(format!(
            "{} does not fit in a synchsafe integer",
            value
        )));
    }

    Ok([
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ])
}

/// Reverse the unsynchronisation scheme: every `FF 00` pair becomes `FF`
pub fn resynchronize(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        out.push(data[i]);
        if data[i] == 0xFF && data.get(i + 1) == Some(&0x00) {
            i += 1;
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_boundaries() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, MAX_SYNCHSAFE] {
            let bytes = encode(value).unwrap();
            assert!(bytes.iter().all(|b| b & 0x80 == 0));
            assert_eq!(decode(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn test_known_encoding() {
        assert_eq!(encode(257).unwrap(), [0x00, 0x00, 0x02, 0x01]);
        assert_eq!(decode(&[0x00, 0x00, 0x02, 0x01]).unwrap(), 257);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(encode(MAX_SYNCHSAFE + 1), Err(TagError::MalformedSize(_))));
        assert!(matches!(encode(u32::MAX), Err(TagError::MalformedSize(_))));
    }

    #[test]
    fn test_short_buffer() {
        assert!(matches!(decode(&[0x01, 0x02, 0x03]), Err(TagError::MalformedSize(_))));
    }

    #[test]
    fn test_top_bit_ignored() {
        assert_eq!(decode(&[0x80, 0x80, 0x80, 0xFF]).unwrap(), 0x7F);
    }

    #[test]
    fn test_resynchronize() {
        assert_eq!(resynchronize(&[0xFF, 0x00, 0xE0, 0x01]), vec![0xFF, 0xE0, 0x01]);
        assert_eq!(resynchronize(&[0xFF, 0x00, 0x00]), vec![0xFF, 0x00]);
        assert_eq!(resynchronize(&[0x01, 0xFF]), vec![0x01, 0xFF]);
    }
}
