// Frame bodies
//
// A closed set of body layouts. Parsing takes the registered `BodyKind` of the
// frame identifier; any payload that doesn't fit its layout is rejected so the
// caller can keep it as `Unsupported` instead.

use super::header::Id3Version;
use super::registry::BodyKind;
use crate::utils::encoding::{self, TextEncoding};

#[derive(Debug, Clone, PartialEq)]
pub enum FrameBody {
    Text(TextBody),
    Comment(CommentBody),
    Url(UrlBody),
    Picture(PictureBody),
    Binary(Vec<u8>),
    DateTime(DateTimeBody),
    /// Original payload of a frame this version doesn't define, or one that failed to parse
    Unsupported(Vec<u8>),
}

impl FrameBody {
    pub fn kind(&self) -> BodyKind {
        match self {
            FrameBody::Text(_) => BodyKind::Text,
            FrameBody::Comment(_) => BodyKind::Comment,
            FrameBody::Url(_) => BodyKind::Url,
            FrameBody::Picture(_) => BodyKind::Picture,
            FrameBody::Binary(_) => BodyKind::Binary,
            FrameBody::DateTime(_) => BodyKind::DateTime,
            FrameBody::Unsupported(_) => BodyKind::Unsupported,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, FrameBody::Unsupported(_))
    }

    /// Parse a payload as `kind`, `None` if it doesn't fit that layout
    pub fn parse(kind: BodyKind, data: &[u8], version: Id3Version) -> Option<FrameBody> {
        match kind {
            BodyKind::Text => TextBody::parse(data).map(FrameBody::Text),
            BodyKind::Comment => CommentBody::parse(data).map(FrameBody::Comment),
            BodyKind::Url => Some(FrameBody::Url(UrlBody::parse(data))),
            BodyKind::Picture => PictureBody::parse(data, version).map(FrameBody::Picture),
            BodyKind::Binary => Some(FrameBody::Binary(data.to_vec())),
            BodyKind::DateTime => DateTimeBody::parse(data).map(FrameBody::DateTime),
            BodyKind::Unsupported => Some(FrameBody::Unsupported(data.to_vec())),
        }
    }

    /// Serialize the payload as it should appear in a tag of `version`
    pub fn to_bytes(&self, version: Id3Version) -> Vec<u8> {
        match self {
            FrameBody::Text(body) => body.to_bytes(version),
            FrameBody::Comment(body) => body.to_bytes(version),
            FrameBody::Url(body) => body.to_bytes(),
            FrameBody::Picture(body) => body.to_bytes(version),
            FrameBody::Binary(data) | FrameBody::Unsupported(data) => data.clone(),
            FrameBody::DateTime(body) => body.to_bytes(version),
        }
    }

    /// Payload size in bytes when written to a tag of `version`
    pub fn size(&self, version: Id3Version) -> usize {
        match self {
            FrameBody::Binary(data) | FrameBody::Unsupported(data) => data.len(),
            other => other.to_bytes(version).len(),
        }
    }

    /// First textual value of the body, empty when it has none
    pub fn content(&self) -> String {
        match self {
            FrameBody::Text(body) => body.first_value().to_string(),
            FrameBody::Comment(body) => body.text.clone(),
            FrameBody::Url(body) => body.url.clone(),
            FrameBody::Picture(body) => body.description.clone(),
            FrameBody::DateTime(body) => body.text(),
            FrameBody::Binary(_) | FrameBody::Unsupported(_) => String::new(),
        }
    }
}

/// Encoding to write `texts` with in a tag of `version`
fn effective_encoding(preferred: TextEncoding, texts: &[&str], version: Id3Version) -> TextEncoding {
    let major = version.major();
    let chosen = preferred.downgrade_for(major);
    if chosen == TextEncoding::Iso8859_1 {
        let needed = encoding::choose_encoding(&texts.concat(), major);
        if needed != TextEncoding::Iso8859_1 {
            return needed;
        }
    }
    chosen
}

/// Decode terminator-separated values
fn decode_values(data: &[u8], encoding: TextEncoding) -> Vec<String> {
    let mut values = Vec::new();
    let mut rest = data;
    while let Some((value, tail)) = encoding::split_terminated(rest, encoding) {
        values.push(value);
        rest = tail;
    }
    if !rest.is_empty() {
        values.push(encoding::decode_text(rest, encoding));
    }
    while values.len() > 1 && values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
    values
}

/// Text information frame (T***), values separated by NUL
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    pub encoding: TextEncoding,
    pub text: String,
}

impl TextBody {
    pub fn new(text: impl Into<String>) -> Self {
        TextBody { encoding: TextEncoding::Iso8859_1, text: text.into() }
    }

    pub fn with_encoding(encoding: TextEncoding, text: impl Into<String>) -> Self {
        TextBody { encoding, text: text.into() }
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.text.split('\0')
    }

    pub fn first_value(&self) -> &str {
        self.values().next().unwrap_or("")
    }

    fn parse(data: &[u8]) -> Option<Self> {
        let (&first, rest) = data.split_first()?;
        let encoding = TextEncoding::from_byte(first)?;
        Some(TextBody { encoding, text: decode_values(rest, encoding).join("\0") })
    }

    fn to_bytes(&self, version: Id3Version) -> Vec<u8> {
        let encoding = effective_encoding(self.encoding, &[&self.text], version);
        let mut out = vec![encoding as u8];
        for (index, value) in self.values().enumerate() {
            if index > 0 {
                out.extend(std::iter::repeat(0u8).take(encoding.terminator_len()));
            }
            out.extend(encoding::encode_text(value, encoding));
        }
        out
    }
}

/// Comment or unsynchronised lyrics (COMM, USLT)
#[derive(Debug, Clone, PartialEq)]
pub struct CommentBody {
    pub encoding: TextEncoding,
    pub language: [u8; 3],
    pub description: String,
    pub text: String,
}

impl CommentBody {
    pub fn new(description: impl Into<String>, text: impl Into<String>) -> Self {
        CommentBody {
            encoding: TextEncoding::Iso8859_1,
            language: *b"eng",
            description: description.into(),
            text: text.into(),
        }
    }

    pub fn language(&self) -> String {
        String::from_utf8_lossy(&self.language).into_owned()
    }

    fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        let encoding = TextEncoding::from_byte(data[0])?;
        let language = [data[1], data[2], data[3]];
        let (description, rest) = encoding::split_terminated(&data[4..], encoding)?;
        Some(CommentBody {
            encoding,
            language,
            description,
            text: encoding::decode_text(rest, encoding),
        })
    }

    fn to_bytes(&self, version: Id3Version) -> Vec<u8> {
        let encoding = effective_encoding(self.encoding, &[&self.description, &self.text], version);
        let mut out = vec![encoding as u8];
        out.extend_from_slice(&self.language);
        out.extend(encoding::encode_terminated(&self.description, encoding));
        out.extend(encoding::encode_text(&self.text, encoding));
        out
    }
}

/// URL link frame (W***)
#[derive(Debug, Clone, PartialEq)]
pub struct UrlBody {
    pub url: String,
}

impl UrlBody {
    pub fn new(url: impl Into<String>) -> Self {
        UrlBody { url: url.into() }
    }

    fn parse(data: &[u8]) -> Self {
        UrlBody { url: encoding::decode_text(data, TextEncoding::Iso8859_1) }
    }

    fn to_bytes(&self) -> Vec<u8> {
        encoding::encode_text(&self.url, TextEncoding::Iso8859_1)
    }
}

/// Attached picture (APIC, PIC)
#[derive(Debug, Clone, PartialEq)]
pub struct PictureBody {
    pub encoding: TextEncoding,
    pub mime_type: String,
    pub picture_type: u8,
    pub description: String,
    pub data: Vec<u8>,
}

impl PictureBody {
    /// Front cover picture type
    pub const COVER_FRONT: u8 = 3;

    fn parse(data: &[u8], version: Id3Version) -> Option<Self> {
        let (&first, rest) = data.split_first()?;
        let encoding = TextEncoding::from_byte(first)?;

        let (mime_type, rest) = if version == Id3Version::V22 {
            if rest.len() < 3 {
                return None;
            }
            let format = encoding::decode_text(&rest[..3], TextEncoding::Iso8859_1);
            (image_format_to_mime(&format), &rest[3..])
        } else {
            encoding::split_terminated(rest, TextEncoding::Iso8859_1)?
        };

        let (&picture_type, rest) = rest.split_first()?;
        let (description, picture) = encoding::split_terminated(rest, encoding)?;

        Some(PictureBody {
            encoding,
            mime_type,
            picture_type,
            description,
            data: picture.to_vec(),
        })
    }

    fn to_bytes(&self, version: Id3Version) -> Vec<u8> {
        let encoding = effective_encoding(self.encoding, &[&self.description], version);
        let mut out = vec![encoding as u8];
        if version == Id3Version::V22 {
            out.extend_from_slice(&mime_to_image_format(&self.mime_type));
        } else {
            out.extend(encoding::encode_terminated(&self.mime_type, TextEncoding::Iso8859_1));
        }
        out.push(self.picture_type);
        out.extend(encoding::encode_terminated(&self.description, encoding));
        out.extend_from_slice(&self.data);
        out
    }
}

/// v2.2 three-letter image format to MIME type
fn image_format_to_mime(format: &str) -> String {
    match format.trim().to_ascii_uppercase().as_str() {
        "JPG" | "JPE" => "image/jpeg".to_string(),
        "PNG" => "image/png".to_string(),
        "GIF" => "image/gif".to_string(),
        "BMP" => "image/bmp".to_string(),
        "-->" => "-->".to_string(),
        other => format!("image/{}", other.to_ascii_lowercase()),
    }
}

/// MIME type to v2.2 three-letter image format
fn mime_to_image_format(mime_type: &str) -> [u8; 3] {
    match mime_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => *b"JPG",
        "image/png" => *b"PNG",
        "-->" => *b"-->",
        other => {
            let subtype = other.rsplit('/').next().unwrap_or("").to_ascii_uppercase();
            let mut format = *b"   ";
            for (slot, byte) in format.iter_mut().zip(subtype.bytes()) {
                *slot = byte;
            }
            format
        }
    }
}

/// One of the four legacy frames merged into a composite recording time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComponent {
    /// TYER/TYE: `YYYY`
    Year,
    /// TDAT/TDA: `DDMM`
    Date,
    /// TIME/TIM: `HHMM`
    Time,
    /// TRDA/TRD: free text
    RecordingDate,
}

/// Composite recording time (TDRC)
///
/// Holds the ISO 8601 timestamp broken into components so that the legacy
/// year, date and time frames can each be merged in independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateTimeBody {
    pub encoding: TextEncoding,
    year: Option<String>,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    recording_date: Option<String>,
    unparsed: Option<String>,
}

impl DateTimeBody {
    /// Build from a timestamp such as `2003-12-15T22:30`; text that isn't a
    /// timestamp is kept verbatim
    pub fn from_text(text: &str) -> Self {
        let mut body = DateTimeBody::default();
        let text = text.trim();
        if !body.apply_timestamp(text) && !text.is_empty() {
            body.unparsed = Some(text.to_string());
        }
        body
    }

    /// Start a body from one legacy component
    pub fn from_component(component: DateComponent, value: &str) -> Self {
        let mut body = DateTimeBody::default();
        body.set_component(component, value);
        body
    }

    /// The timestamp is the first value, a recording date the second
    fn parse(data: &[u8]) -> Option<Self> {
        let (&first, rest) = data.split_first()?;
        let encoding = TextEncoding::from_byte(first)?;
        let mut values = decode_values(rest, encoding).into_iter();
        let mut body = DateTimeBody::from_text(&values.next().unwrap_or_default());
        if let Some(recording_date) = values.next() {
            body.set_recording_date(&recording_date);
        }
        body.encoding = encoding;
        Some(body)
    }

    fn to_bytes(&self, version: Id3Version) -> Vec<u8> {
        let mut text = self.timestamp().or_else(|| self.unparsed.clone()).unwrap_or_default();
        if let Some(recording_date) = &self.recording_date {
            text.push('\0');
            text.push_str(recording_date);
        }
        let encoding = effective_encoding(self.encoding, &[&text], version);
        let mut out = vec![encoding as u8];
        out.extend(encoding::encode_text(&text, encoding));
        out
    }

    /// Accepts `YYYY[-MM[-DD]]` or `--MM[-DD]`, optionally followed by `THH[:MM[:SS]]`
    fn apply_timestamp(&mut self, text: &str) -> bool {
        let (date, time) = match text.find('T') {
            Some(pos) => (&text[..pos], Some(&text[pos + 1..])),
            None => (text, None),
        };
        let Some((year, month, day)) = parse_date_part(date) else {
            return false;
        };
        let (hour, minute, second) = match time.map(parse_time_part) {
            Some(Some(parts)) => parts,
            Some(None) => return false,
            None => (None, None, None),
        };
        if year.is_none() && month.is_none() && hour.is_none() {
            return false;
        }

        self.year = year;
        self.month = month;
        self.day = day;
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self.unparsed = None;
        true
    }

    /// Update one component; returns false and leaves the body alone when `value` is malformed
    pub fn set_component(&mut self, component: DateComponent, value: &str) -> bool {
        match component {
            DateComponent::Year => self.set_year(value),
            DateComponent::Date => self.set_date(value),
            DateComponent::Time => self.set_time(value),
            DateComponent::RecordingDate => self.set_recording_date(value),
        }
    }

    pub fn set_year(&mut self, year: &str) -> bool {
        let year = year.trim();
        if year.len() < 4 || !year.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
            return false;
        }
        self.year = Some(year[..4].to_string());
        self.unparsed = None;
        true
    }

    /// `DDMM`
    pub fn set_date(&mut self, date: &str) -> bool {
        match split_pair(date) {
            Some((day, month)) if (1..=31).contains(&day) && (1..=12).contains(&month) => {
                self.day = Some(day);
                self.month = Some(month);
                self.unparsed = None;
                true
            }
            _ => false,
        }
    }

    /// `HHMM`
    pub fn set_time(&mut self, time: &str) -> bool {
        match split_pair(time) {
            Some((hour, minute)) if hour < 24 && minute < 60 => {
                self.hour = Some(hour);
                self.minute = Some(minute);
                self.unparsed = None;
                true
            }
            _ => false,
        }
    }

    pub fn set_recording_date(&mut self, recording_date: &str) -> bool {
        let recording_date = recording_date.trim();
        if recording_date.is_empty() {
            return false;
        }
        self.recording_date = Some(recording_date.to_string());
        true
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    /// Date as `DDMM`
    pub fn date(&self) -> Option<String> {
        Some(format!("{:02}{:02}", self.day?, self.month?))
    }

    /// Time as `HHMM`
    pub fn time(&self) -> Option<String> {
        Some(format!("{:02}{:02}", self.hour?, self.minute?))
    }

    pub fn recording_date(&self) -> Option<&str> {
        self.recording_date.as_deref()
    }

    /// Text that didn't parse as a timestamp
    pub fn unparsed(&self) -> Option<&str> {
        self.unparsed.as_deref()
    }

    /// Timestamp built from the set components, `None` when there are none
    ///
    /// Missing coarser parts are left out rather than hiding finer ones, so a
    /// date without a year reads `--12-15` and a time alone `T22:30`.
    pub fn timestamp(&self) -> Option<String> {
        let mut text = String::new();
        match &self.year {
            Some(year) => text.push_str(year),
            None if self.month.is_some() => text.push('-'),
            None => {}
        }
        if let Some(month) = self.month {
            text.push_str(&format!("-{:02}", month));
            if let Some(day) = self.day {
                text.push_str(&format!("-{:02}", day));
            }
        }
        if let Some(hour) = self.hour {
            text.push_str(&format!("T{:02}", hour));
            if let Some(minute) = self.minute {
                text.push_str(&format!(":{:02}", minute));
                if let Some(second) = self.second {
                    text.push_str(&format!(":{:02}", second));
                }
            }
        }
        (!text.is_empty()).then_some(text)
    }

    /// Text shown for the frame
    pub fn text(&self) -> String {
        self.timestamp()
            .or_else(|| self.unparsed.clone())
            .or_else(|| self.recording_date.clone())
            .unwrap_or_default()
    }
}

/// Date half of a timestamp: year, month and day
fn parse_date_part(date: &str) -> Option<(Option<String>, Option<u8>, Option<u8>)> {
    if date.is_empty() {
        return Some((None, None, None));
    }
    let (year, rest) = match date.strip_prefix("--") {
        Some(rest) => (None, rest),
        None => {
            let year = date.get(..4).filter(|year| year.bytes().all(|b| b.is_ascii_digit()))?;
            match &date[4..] {
                "" => return Some((Some(year.to_string()), None, None)),
                rest => (Some(year.to_string()), rest.strip_prefix('-')?),
            }
        }
    };

    let mut parts = rest.split('-');
    let month = parts.next().and_then(two_digits).filter(|m| (1..=12).contains(m))?;
    let day = match parts.next() {
        Some(part) => Some(two_digits(part).filter(|d| (1..=31).contains(d))?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((year, Some(month), day))
}

/// Time half of a timestamp: hour, minute and second
fn parse_time_part(time: &str) -> Option<(Option<u8>, Option<u8>, Option<u8>)> {
    let mut parts = time.split(':');
    let hour = parts.next().and_then(two_digits).filter(|h| *h < 24)?;
    let mut rest = [None; 2];
    for slot in rest.iter_mut() {
        if let Some(part) = parts.next() {
            *slot = Some(two_digits(part).filter(|v| *v < 60)?);
        }
    }
    if parts.next().is_some() {
        return None;
    }
    Some((Some(hour), rest[0], rest[1]))
}

fn two_digits(value: &str) -> Option<u8> {
    let bytes = value.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some((bytes[0] - b'0') * 10 + (bytes[1] - b'0'))
}

/// Split a four-digit `AABB` value into its two halves
fn split_pair(value: &str) -> Option<(u8, u8)> {
    let bytes = value.trim().as_bytes();
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let digit = |i: usize| bytes[i] - b'0';
    Some((digit(0) * 10 + digit(1), digit(2) * 10 + digit(3)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_values_round_trip() {
        let body = TextBody::new("one\0two");
        let bytes = body.to_bytes(Id3Version::V24);
        assert_eq!(bytes, b"\x00one\x00two".to_vec());
        let parsed = FrameBody::parse(BodyKind::Text, &bytes, Id3Version::V24).unwrap();
        assert_eq!(parsed.content(), "one");
        assert_eq!(parsed, FrameBody::Text(body));
    }

    #[test]
    fn test_text_encoding_upgraded_when_needed() {
        let body = TextBody::new("Björk 日本");
        assert_eq!(body.to_bytes(Id3Version::V23)[0], TextEncoding::Utf16 as u8);
        assert_eq!(body.to_bytes(Id3Version::V24)[0], TextEncoding::Utf8 as u8);

        let utf8 = TextBody::with_encoding(TextEncoding::Utf8, "abc");
        assert_eq!(utf8.to_bytes(Id3Version::V23)[0], TextEncoding::Utf16 as u8);
    }

    #[test]
    fn test_invalid_encoding_byte_rejected() {
        assert!(FrameBody::parse(BodyKind::Text, b"\x07abc", Id3Version::V23).is_none());
    }

    #[test]
    fn test_comment_layout() {
        let body = CommentBody::new("desc", "hello");
        let bytes = body.to_bytes(Id3Version::V23);
        assert_eq!(bytes, b"\x00engdesc\x00hello".to_vec());
        match FrameBody::parse(BodyKind::Comment, &bytes, Id3Version::V23).unwrap() {
            FrameBody::Comment(parsed) => {
                assert_eq!(parsed.language(), "eng");
                assert_eq!(parsed.description, "desc");
                assert_eq!(parsed.text, "hello");
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert!(FrameBody::parse(BodyKind::Comment, b"\x00en", Id3Version::V23).is_none());
    }

    #[test]
    fn test_picture_v22_and_v23_layouts() {
        let picture = PictureBody {
            encoding: TextEncoding::Iso8859_1,
            mime_type: "image/png".to_string(),
            picture_type: PictureBody::COVER_FRONT,
            description: "cover".to_string(),
            data: vec![0x89, b'P', b'N', b'G'],
        };

        let v22 = picture.to_bytes(Id3Version::V22);
        assert_eq!(&v22[1..4], b"PNG");
        let v23 = picture.to_bytes(Id3Version::V23);
        assert_eq!(&v23[1..11], b"image/png\x00");

        for (version, bytes) in [(Id3Version::V22, v22), (Id3Version::V23, v23)] {
            let parsed = FrameBody::parse(BodyKind::Picture, &bytes, version).unwrap();
            assert_eq!(parsed, FrameBody::Picture(picture.clone()));
        }
    }

    #[test]
    fn test_datetime_components() {
        let mut body = DateTimeBody::from_component(DateComponent::Year, "2003");
        assert!(body.set_component(DateComponent::Date, "1512"));
        assert!(body.set_component(DateComponent::Time, "2230"));
        assert_eq!(body.text(), "2003-12-15T22:30");
        assert_eq!(body.date().as_deref(), Some("1512"));
        assert_eq!(body.time().as_deref(), Some("2230"));
        assert!(!body.set_date("12/15"));
        assert_eq!(body.text(), "2003-12-15T22:30");
    }

    #[test]
    fn test_datetime_parse() {
        let body = DateTimeBody::from_text("1999-07-04T10:20:30");
        assert_eq!(body.year(), Some("1999"));
        assert_eq!(body.text(), "1999-07-04T10:20:30");

        let month_only = DateTimeBody::from_text("2001-02");
        assert_eq!(month_only.text(), "2001-02");
        assert_eq!(month_only.date(), None);

        let odd = DateTimeBody::from_text("Summer 1969");
        assert_eq!(odd.year(), None);
        assert_eq!(odd.unparsed(), Some("Summer 1969"));
        assert_eq!(odd.text(), "Summer 1969");
    }

    #[test]
    fn test_partial_components_written() {
        let mut body = DateTimeBody::from_component(DateComponent::Year, "2010");
        body.set_time("0930");
        assert_eq!(body.text(), "2010T09:30");
        assert_eq!(DateTimeBody::from_text("2010T09:30"), body);

        let mut body = DateTimeBody::from_component(DateComponent::Date, "1512");
        assert_eq!(body.text(), "--12-15");
        body.set_time("2230");
        assert_eq!(body.text(), "--12-15T22:30");
        assert_eq!(DateTimeBody::from_text("--12-15T22:30"), body);

        let time_only = DateTimeBody::from_component(DateComponent::Time, "0705");
        assert_eq!(time_only.text(), "T07:05");
        assert_eq!(time_only.year(), None);

        assert_eq!(DateTimeBody::from_text("--13-01").unparsed(), Some("--13-01"));
        assert_eq!(DateTimeBody::from_text("2001T").unparsed(), Some("2001T"));
    }

    #[test]
    fn test_recording_date_written_as_second_value() {
        let mut body = DateTimeBody::from_component(DateComponent::Year, "2003");
        body.set_recording_date("Dec 15th");
        let bytes = body.to_bytes(Id3Version::V24);
        assert_eq!(bytes, b"\x002003\x00Dec 15th".to_vec());
        assert_eq!(DateTimeBody::parse(&bytes), Some(body));

        let only = DateTimeBody::from_component(DateComponent::RecordingDate, "Spring");
        let bytes = only.to_bytes(Id3Version::V24);
        assert_eq!(bytes, b"\x00\x00Spring".to_vec());
        let parsed = DateTimeBody::parse(&bytes).unwrap();
        assert_eq!(parsed.recording_date(), Some("Spring"));
        assert_eq!(parsed, only);
    }
}
