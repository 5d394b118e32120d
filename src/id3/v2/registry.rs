// Per-version frame tables
//
// Each ID3v2 version has its own set of frame identifiers. The tables below
// record how the body of every known frame is laid out and whether a tag may
// hold more than one frame with that identifier. Identifiers missing from a
// table resolve to `BodyKind::Unsupported` so unknown frames pass through
// untouched.

use super::header::Id3Version;
use serde::Serialize;

/// Layout of a frame body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyKind {
    /// Encoding byte followed by one or more strings
    Text,
    /// Encoding, language, description and text (COMM, USLT)
    Comment,
    /// ISO-8859-1 URL
    Url,
    /// Attached picture (APIC, PIC)
    Picture,
    /// Bytes kept as read
    Binary,
    /// Composite recording time (TDRC)
    DateTime,
    /// Not part of this version's frame set
    Unsupported,
}

#[derive(Debug)]
pub struct FrameSpec {
    pub id: &'static str,
    pub kind: BodyKind,
    pub multiple: bool,
    pub description: &'static str,
}

macro_rules! frame {
    ($id:literal, $kind:ident, multiple, $description:literal) => {
        FrameSpec { id: $id, kind: BodyKind::$kind, multiple: true, description: $description }
    };
    ($id:literal, $kind:ident, $description:literal) => {
        FrameSpec { id: $id, kind: BodyKind::$kind, multiple: false, description: $description }
    };
}

/// Immutable frame table for one version
#[derive(Debug)]
pub struct FrameRegistry {
    pub version: Id3Version,
    frames: &'static [FrameSpec],
}

impl FrameRegistry {
    pub fn for_version(version: Id3Version) -> &'static FrameRegistry {
        match version {
            Id3Version::V22 => &V22_REGISTRY,
            Id3Version::V23 => &V23_REGISTRY,
            Id3Version::V24 => &V24_REGISTRY,
        }
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, id: &str) -> Option<&'static FrameSpec> {
        self.frames.iter().find(|spec| spec.id == id)
    }

    pub fn kind_of(&self, id: &str) -> BodyKind {
        self.lookup(id).map_or(BodyKind::Unsupported, |spec| spec.kind)
    }

    /// Identifiers this version doesn't know follow whichever version defines
    /// them; an identifier no version defines may appear once
    pub fn is_multiple_allowed(&self, id: &str) -> bool {
        match self.lookup(id) {
            Some(spec) => spec.multiple,
            None => [&V22_REGISTRY, &V23_REGISTRY, &V24_REGISTRY]
                .into_iter()
                .filter_map(|registry| registry.lookup(id))
                .any(|spec| spec.multiple),
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = &'static FrameSpec> {
        self.frames.iter()
    }
}

static V22_REGISTRY: FrameRegistry = FrameRegistry { version: Id3Version::V22, frames: V22_FRAMES };
static V23_REGISTRY: FrameRegistry = FrameRegistry { version: Id3Version::V23, frames: V23_FRAMES };
static V24_REGISTRY: FrameRegistry = FrameRegistry { version: Id3Version::V24, frames: V24_FRAMES };

const V22_FRAMES: &[FrameSpec] = &[
    frame!("BUF", Binary, "Recommended buffer size"),
    frame!("CNT", Binary, "Play counter"),
    frame!("COM", Comment, multiple, "Comments"),
    frame!("CRA", Binary, multiple, "Audio encryption"),
    frame!("CRM", Binary, multiple, "Encrypted meta frame"),
    frame!("EQU", Binary, "Equalization"),
    frame!("ETC", Binary, "Event timing codes"),
    frame!("GEO", Binary, multiple, "General encapsulated object"),
    frame!("IPL", Text, "Involved people list"),
    frame!("LNK", Binary, multiple, "Linked information"),
    frame!("MCI", Binary, "Music CD identifier"),
    frame!("MLL", Binary, "MPEG location lookup table"),
    frame!("PIC", Picture, multiple, "Attached picture"),
    frame!("POP", Binary, multiple, "Popularimeter"),
    frame!("REV", Binary, "Reverb"),
    frame!("RVA", Binary, "Relative volume adjustment"),
    frame!("SLT", Binary, multiple, "Synchronized lyric/text"),
    frame!("STC", Binary, "Synced tempo codes"),
    frame!("TAL", Text, "Album/Movie/Show title"),
    frame!("TBP", Text, "BPM"),
    frame!("TCM", Text, "Composer"),
    frame!("TCO", Text, "Content type"),
    frame!("TCP", Text, "Compilation"),
    frame!("TCR", Text, "Copyright message"),
    frame!("TDA", Text, "Date"),
    frame!("TDY", Text, "Playlist delay"),
    frame!("TEN", Text, "Encoded by"),
    frame!("TFT", Text, "File type"),
    frame!("TIM", Text, "Time"),
    frame!("TKE", Text, "Initial key"),
    frame!("TLA", Text, "Language(s)"),
    frame!("TLE", Text, "Length"),
    frame!("TMT", Text, "Media type"),
    frame!("TOA", Text, "Original artist(s)/performer(s)"),
    frame!("TOF", Text, "Original filename"),
    frame!("TOL", Text, "Original lyricist(s)/text writer(s)"),
    frame!("TOR", Text, "Original release year"),
    frame!("TOT", Text, "Original album/Movie/Show title"),
    frame!("TP1", Text, "Lead artist(s)/Lead performer(s)"),
    frame!("TP2", Text, "Band/Orchestra/Accompaniment"),
    frame!("TP3", Text, "Conductor"),
    frame!("TP4", Text, "Interpreted, remixed, or otherwise modified by"),
    frame!("TPA", Text, "Part of a set"),
    frame!("TPB", Text, "Publisher"),
    frame!("TRC", Text, "ISRC"),
    frame!("TRD", Text, "Recording dates"),
    frame!("TRK", Text, "Track number/Position in set"),
    frame!("TS2", Text, "Album artist sort order"),
    frame!("TSA", Text, "Album sort order"),
    frame!("TSI", Text, "Size"),
    frame!("TSP", Text, "Performer sort order"),
    frame!("TSS", Text, "Software/hardware and settings used for encoding"),
    frame!("TST", Text, "Title sort order"),
    frame!("TT1", Text, "Content group description"),
    frame!("TT2", Text, "Title/Songname/Content description"),
    frame!("TT3", Text, "Subtitle/Description refinement"),
    frame!("TXT", Text, "Lyricist/text writer"),
    frame!("TXX", Binary, multiple, "User defined text information frame"),
    frame!("TYE", Text, "Year"),
    frame!("UFI", Binary, multiple, "Unique file identifier"),
    frame!("ULT", Comment, multiple, "Unsychronized lyric/text transcription"),
    frame!("WAF", Url, "Official audio file webpage"),
    frame!("WAR", Url, "Official artist/performer webpage"),
    frame!("WAS", Url, "Official audio source webpage"),
    frame!("WCM", Url, multiple, "Commercial information"),
    frame!("WCP", Url, "Copyright/Legal information"),
    frame!("WPB", Url, "Publishers official webpage"),
    frame!("WXX", Binary, multiple, "User defined URL link frame"),
];

const V23_FRAMES: &[FrameSpec] = &[
    frame!("AENC", Binary, multiple, "Audio encryption"),
    frame!("APIC", Picture, multiple, "Attached picture"),
    frame!("COMM", Comment, multiple, "Comments"),
    frame!("COMR", Binary, multiple, "Commercial frame"),
    frame!("ENCR", Binary, multiple, "Encryption method registration"),
    frame!("EQUA", Binary, "Equalization"),
    frame!("ETCO", Binary, "Event timing codes"),
    frame!("GEOB", Binary, multiple, "General encapsulated object"),
    frame!("GRID", Binary, multiple, "Group identification registration"),
    frame!("IPLS", Text, "Involved people list"),
    frame!("LINK", Binary, multiple, "Linked information"),
    frame!("MCDI", Binary, "Music CD identifier"),
    frame!("MLLT", Binary, "MPEG location lookup table"),
    frame!("OWNE", Binary, "Ownership frame"),
    frame!("PCNT", Binary, "Play counter"),
    frame!("POPM", Binary, multiple, "Popularimeter"),
    frame!("POSS", Binary, "Position synchronisation frame"),
    frame!("PRIV", Binary, multiple, "Private frame"),
    frame!("RBUF", Binary, "Recommended buffer size"),
    frame!("RVAD", Binary, "Relative volume adjustment"),
    frame!("RVRB", Binary, "Reverb"),
    frame!("SYLT", Binary, multiple, "Synchronized lyric/text"),
    frame!("SYTC", Binary, "Synchronized tempo codes"),
    frame!("TALB", Text, "Album/Movie/Show title"),
    frame!("TBPM", Text, "BPM (beats per minute)"),
    frame!("TCMP", Text, "Compilation"),
    frame!("TCOM", Text, "Composer"),
    frame!("TCON", Text, "Content type"),
    frame!("TCOP", Text, "Copyright message"),
    frame!("TDAT", Text, "Date"),
    frame!("TDLY", Text, "Playlist delay"),
    frame!("TENC", Text, "Encoded by"),
    frame!("TEXT", Text, "Lyricist/Text writer"),
    frame!("TFLT", Text, "File type"),
    frame!("TIME", Text, "Time"),
    frame!("TIT1", Text, "Content group description"),
    frame!("TIT2", Text, "Title/songname/content description"),
    frame!("TIT3", Text, "Subtitle/Description refinement"),
    frame!("TKEY", Text, "Initial key"),
    frame!("TLAN", Text, "Language(s)"),
    frame!("TLEN", Text, "Length"),
    frame!("TMED", Text, "Media type"),
    frame!("TOAL", Text, "Original album/movie/show title"),
    frame!("TOFN", Text, "Original filename"),
    frame!("TOLY", Text, "Original lyricist(s)/text writer(s)"),
    frame!("TOPE", Text, "Original artist(s)/performer(s)"),
    frame!("TORY", Text, "Original release year"),
    frame!("TOWN", Text, "File owner/licensee"),
    frame!("TPE1", Text, "Lead performer(s)/Soloist(s)"),
    frame!("TPE2", Text, "Band/orchestra/accompaniment"),
    frame!("TPE3", Text, "Conductor/performer refinement"),
    frame!("TPE4", Text, "Interpreted, remixed, or otherwise modified by"),
    frame!("TPOS", Text, "Part of a set"),
    frame!("TPUB", Text, "Publisher"),
    frame!("TRCK", Text, "Track number/Position in set"),
    frame!("TRDA", Text, "Recording dates"),
    frame!("TRSN", Text, "Internet radio station name"),
    frame!("TRSO", Text, "Internet radio station owner"),
    frame!("TSIZ", Text, "Size"),
    frame!("TSO2", Text, "Album artist sort order"),
    frame!("TSOA", Text, "Album sort order"),
    frame!("TSOP", Text, "Performer sort order"),
    frame!("TSOT", Text, "Title sort order"),
    frame!("TSRC", Text, "ISRC (international standard recording code)"),
    frame!("TSSE", Text, "Software/Hardware and settings used for encoding"),
    frame!("TXXX", Binary, multiple, "User defined text information frame"),
    frame!("TYER", Text, "Year"),
    frame!("UFID", Binary, multiple, "Unique file identifier"),
    frame!("USER", Binary, multiple, "Terms of use"),
    frame!("USLT", Comment, multiple, "Unsychronized lyric/text transcription"),
    frame!("WCOM", Url, multiple, "Commercial information"),
    frame!("WCOP", Url, "Copyright/Legal information"),
    frame!("WOAF", Url, "Official audio file webpage"),
    frame!("WOAR", Url, multiple, "Official artist/performer webpage"),
    frame!("WOAS", Url, "Official audio source webpage"),
    frame!("WORS", Url, "Official internet radio station homepage"),
    frame!("WPAY", Url, "Payment"),
    frame!("WPUB", Url, "Publishers official webpage"),
    frame!("WXXX", Binary, multiple, "User defined URL link frame"),
];

const V24_FRAMES: &[FrameSpec] = &[
    frame!("AENC", Binary, multiple, "Audio encryption"),
    frame!("APIC", Picture, multiple, "Attached picture"),
    frame!("ASPI", Binary, "Audio seek point index"),
    frame!("COMM", Comment, multiple, "Comments"),
    frame!("COMR", Binary, multiple, "Commercial frame"),
    frame!("ENCR", Binary, multiple, "Encryption method registration"),
    frame!("EQU2", Binary, multiple, "Equalisation (2)"),
    frame!("ETCO", Binary, "Event timing codes"),
    frame!("GEOB", Binary, multiple, "General encapsulated object"),
    frame!("GRID", Binary, multiple, "Group identification registration"),
    frame!("LINK", Binary, multiple, "Linked information"),
    frame!("MCDI", Binary, "Music CD identifier"),
    frame!("MLLT", Binary, "MPEG location lookup table"),
    frame!("OWNE", Binary, "Ownership frame"),
    frame!("PCNT", Binary, "Play counter"),
    frame!("POPM", Binary, multiple, "Popularimeter"),
    frame!("POSS", Binary, "Position synchronisation frame"),
    frame!("PRIV", Binary, multiple, "Private frame"),
    frame!("RBUF", Binary, "Recommended buffer size"),
    frame!("RVA2", Binary, multiple, "Relative volume adjustment (2)"),
    frame!("RVRB", Binary, "Reverb"),
    frame!("SEEK", Binary, "Seek frame"),
    frame!("SIGN", Binary, multiple, "Signature frame"),
    frame!("SYLT", Binary, multiple, "Synchronised lyric/text"),
    frame!("SYTC", Binary, "Synchronised tempo codes"),
    frame!("TALB", Text, "Album/Movie/Show title"),
    frame!("TBPM", Text, "BPM (beats per minute)"),
    frame!("TCMP", Text, "Compilation"),
    frame!("TCOM", Text, "Composer"),
    frame!("TCON", Text, "Content type"),
    frame!("TCOP", Text, "Copyright message"),
    frame!("TDEN", Text, "Encoding time"),
    frame!("TDLY", Text, "Playlist delay"),
    frame!("TDOR", Text, "Original release time"),
    frame!("TDRC", DateTime, "Recording time"),
    frame!("TDRL", Text, "Release time"),
    frame!("TDTG", Text, "Tagging time"),
    frame!("TENC", Text, "Encoded by"),
    frame!("TEXT", Text, "Lyricist/Text writer"),
    frame!("TFLT", Text, "File type"),
    frame!("TIPL", Text, "Involved people list"),
    frame!("TIT1", Text, "Content group description"),
    frame!("TIT2", Text, "Title/songname/content description"),
    frame!("TIT3", Text, "Subtitle/Description refinement"),
    frame!("TKEY", Text, "Initial key"),
    frame!("TLAN", Text, "Language(s)"),
    frame!("TLEN", Text, "Length"),
    frame!("TMCL", Text, "Musician credits list"),
    frame!("TMED", Text, "Media type"),
    frame!("TMOO", Text, "Mood"),
    frame!("TOAL", Text, "Original album/movie/show title"),
    frame!("TOFN", Text, "Original filename"),
    frame!("TOLY", Text, "Original lyricist(s)/text writer(s)"),
    frame!("TOPE", Text, "Original artist(s)/performer(s)"),
    frame!("TOWN", Text, "File owner/licensee"),
    frame!("TPE1", Text, "Lead performer(s)/Soloist(s)"),
    frame!("TPE2", Text, "Band/orchestra/accompaniment"),
    frame!("TPE3", Text, "Conductor/performer refinement"),
    frame!("TPE4", Text, "Interpreted, remixed, or otherwise modified by"),
    frame!("TPOS", Text, "Part of a set"),
    frame!("TPRO", Text, "Produced notice"),
    frame!("TPUB", Text, "Publisher"),
    frame!("TRCK", Text, "Track number/Position in set"),
    frame!("TRSN", Text, "Internet radio station name"),
    frame!("TRSO", Text, "Internet radio station owner"),
    frame!("TSO2", Text, "Album artist sort order"),
    frame!("TSOA", Text, "Album sort order"),
    frame!("TSOP", Text, "Performer sort order"),
    frame!("TSOT", Text, "Title sort order"),
    frame!("TSRC", Text, "ISRC (international standard recording code)"),
    frame!("TSSE", Text, "Software/Hardware and settings used for encoding"),
    frame!("TSST", Text, "Set subtitle"),
    frame!("TXXX", Binary, multiple, "User defined text information frame"),
    frame!("UFID", Binary, multiple, "Unique file identifier"),
    frame!("USER", Binary, multiple, "Terms of use"),
    frame!("USLT", Comment, multiple, "Unsynchronised lyric/text transcription"),
    frame!("WCOM", Url, multiple, "Commercial information"),
    frame!("WCOP", Url, "Copyright/Legal information"),
    frame!("WOAF", Url, "Official audio file webpage"),
    frame!("WOAR", Url, multiple, "Official artist/performer webpage"),
    frame!("WOAS", Url, "Official audio source webpage"),
    frame!("WORS", Url, "Official Internet radio station homepage"),
    frame!("WPAY", Url, "Payment"),
    frame!("WPUB", Url, "Publishers official webpage"),
    frame!("WXXX", Binary, multiple, "User defined URL link frame"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_widths_match_version() {
        for version in [Id3Version::V22, Id3Version::V23, Id3Version::V24] {
            let registry = FrameRegistry::for_version(version);
            assert!(registry.frames().all(|spec| spec.id.len() == version.frame_id_len()));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = FrameRegistry::for_version(Id3Version::V23);
        assert_eq!(registry.kind_of("TIT2"), BodyKind::Text);
        assert_eq!(registry.kind_of("tit2"), BodyKind::Unsupported);
    }

    #[test]
    fn test_version_specific_kinds() {
        assert_eq!(FrameRegistry::for_version(Id3Version::V24).kind_of("TDRC"), BodyKind::DateTime);
        assert_eq!(FrameRegistry::for_version(Id3Version::V23).kind_of("TDRC"), BodyKind::Unsupported);
        assert_eq!(FrameRegistry::for_version(Id3Version::V24).kind_of("TYER"), BodyKind::Unsupported);
        assert_eq!(FrameRegistry::for_version(Id3Version::V22).kind_of("PIC"), BodyKind::Picture);
    }

    #[test]
    fn test_multiplicity() {
        let registry = FrameRegistry::for_version(Id3Version::V23);
        assert!(registry.is_multiple_allowed("COMM"));
        assert!(registry.is_multiple_allowed("APIC"));
        assert!(!registry.is_multiple_allowed("TIT2"));
        assert!(!registry.is_multiple_allowed("XYZW"));
    }

    #[test]
    fn test_multiplicity_of_other_versions_frames() {
        let v24 = FrameRegistry::for_version(Id3Version::V24);
        assert!(v24.lookup("TYER").is_none());
        assert!(!v24.is_multiple_allowed("TYER"));
        assert!(!v24.is_multiple_allowed("IPLS"));

        let v23 = FrameRegistry::for_version(Id3Version::V23);
        assert!(v23.lookup("TDRC").is_none());
        assert!(!v23.is_multiple_allowed("TDRC"));
        assert!(v23.lookup("RVA2").is_none());
        assert!(v23.is_multiple_allowed("RVA2"));
    }
}
