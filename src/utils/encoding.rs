// Encoding utilities for ID3v2 text fields

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use serde::Serialize;

/// Text encoding types, as stored in the leading byte of text-bearing frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    #[default]
    Iso8859_1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    /// Map the encoding byte of a frame, `None` for values the standard doesn't define
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TextEncoding::Iso8859_1),
            1 => Some(TextEncoding::Utf16),
            2 => Some(TextEncoding::Utf16BE),
            3 => Some(TextEncoding::Utf8),
            _ => None,
        }
    }

    /// Whether a tag of this major version may use the encoding
    pub fn allowed_in(self, major_version: u8) -> bool {
        match self {
            TextEncoding::Iso8859_1 | TextEncoding::Utf16 => true,
            TextEncoding::Utf16BE | TextEncoding::Utf8 => major_version >= 4,
        }
    }

    /// Replace an encoding the major version can't express with UTF-16
    pub fn downgrade_for(self, major_version: u8) -> Self {
        if self.allowed_in(major_version) {
            self
        } else {
            TextEncoding::Utf16
        }
    }

    /// Width of the string terminator in bytes
    pub fn terminator_len(self) -> usize {
        match self {
            TextEncoding::Iso8859_1 | TextEncoding::Utf8 => 1,
            TextEncoding::Utf16 | TextEncoding::Utf16BE => 2,
        }
    }
}

/// Pick the narrowest encoding that can hold `text` in a tag of this major version
pub fn choose_encoding(text: &str, major_version: u8) -> TextEncoding {
    let (_, _, had_errors) = WINDOWS_1252.encode(text);
    if !had_errors {
        TextEncoding::Iso8859_1
    } else if major_version >= 4 {
        TextEncoding::Utf8
    } else {
        TextEncoding::Utf16
    }
}

/// Decode text with specified encoding, dropping trailing terminators
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    let decoded = match encoding {
        TextEncoding::Iso8859_1 => WINDOWS_1252.decode_without_bom_handling(data).0.into_owned(),
        TextEncoding::Utf16 => {
            // Detect BOM
            if data.len() >= 2 && data[0..2] == [0xFF, 0xFE] {
                UTF_16LE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else if data.len() >= 2 && data[0..2] == [0xFE, 0xFF] {
                UTF_16BE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else {
                UTF_16LE.decode_without_bom_handling(data).0.into_owned()
            }
        }
        TextEncoding::Utf16BE => UTF_16BE.decode_without_bom_handling(data).0.into_owned(),
        TextEncoding::Utf8 => UTF_8.decode_without_bom_handling(data).0.into_owned(),
    };

    decoded.trim_end_matches('\0').to_string()
}

/// Encode text with specified encoding, without a terminator
pub fn encode_text(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Iso8859_1 => WINDOWS_1252.encode(text).0.into_owned(),
        TextEncoding::Utf16 => {
            let mut bytes = vec![0xFF, 0xFE];
            bytes.extend(text.encode_utf16().flat_map(|unit| unit.to_le_bytes()));
            bytes
        }
        TextEncoding::Utf16BE => text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect(),
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
    }
}

/// Encode text followed by the encoding's terminator
pub fn encode_terminated(text: &str, encoding: TextEncoding) -> Vec<u8> {
    let mut bytes = encode_text(text, encoding);
    bytes.extend(std::iter::repeat(0u8).take(encoding.terminator_len()));
    bytes
}

/// Split a terminated string off the front of `data`
///
/// Returns the decoded string and the bytes after the terminator, or `None`
/// when no terminator is present.
pub fn split_terminated(data: &[u8], encoding: TextEncoding) -> Option<(String, &[u8])> {
    let end = match encoding.terminator_len() {
        1 => data.iter().position(|&b| b == 0)?,
        _ => (0..data.len().saturating_sub(1))
            .step_by(2)
            .find(|&i| data[i] == 0 && data[i + 1] == 0)?,
    };

    let text = decode_text(&data[..end], encoding);
    Some((text, &data[end + encoding.terminator_len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_uses_bom_and_two_byte_units() {
        let bytes = encode_text("Hé", TextEncoding::Utf16);
        assert_eq!(bytes, vec![0xFF, 0xFE, b'H', 0x00, 0xE9, 0x00]);
        assert_eq!(decode_text(&bytes, TextEncoding::Utf16), "Hé");
    }

    #[test]
    fn test_utf16_be_has_no_bom() {
        let bytes = encode_text("A", TextEncoding::Utf16BE);
        assert_eq!(bytes, vec![0x00, b'A']);
    }

    #[test]
    fn test_trailing_nulls_dropped() {
        assert_eq!(decode_text(b"Title\0\0", TextEncoding::Iso8859_1), "Title");
    }

    #[test]
    fn test_split_terminated_utf16() {
        let mut data = encode_terminated("desc", TextEncoding::Utf16);
        data.extend_from_slice(&[1, 2, 3]);
        let (text, rest) = split_terminated(&data, TextEncoding::Utf16).unwrap();
        assert_eq!(text, "desc");
        assert_eq!(rest, &[1, 2, 3]);
    }

    #[test]
    fn test_split_terminated_missing() {
        assert!(split_terminated(b"no terminator", TextEncoding::Iso8859_1).is_none());
    }

    #[test]
    fn test_choose_encoding() {
        assert_eq!(choose_encoding("plain", 3), TextEncoding::Iso8859_1);
        assert_eq!(choose_encoding("日本", 3), TextEncoding::Utf16);
        assert_eq!(choose_encoding("日本", 4), TextEncoding::Utf8);
        assert_eq!(TextEncoding::Utf8.downgrade_for(3), TextEncoding::Utf16);
    }
}
