// Version conversion between ID3v2.2, ID3v2.3 and ID3v2.4
//
// Conversion is stepwise between adjacent versions and never touches the
// source tag. Frames are inserted with the same duplicate policy used when
// reading; anything that can't be placed is dropped and reported.

use super::body::{DateComponent, DateTimeBody, FrameBody};
use super::frame::Frame;
use super::frame_map::{FrameMapBuilder, FrameSlot};
use super::header::Id3Version;
use super::registry::{BodyKind, FrameRegistry};
use super::Id3v2Tag;
use log::{debug, warn};

/// ID3v2.2 identifiers and their ID3v2.3 equivalents
const V22_TO_V23: &[(&str, &str)] = &[
    ("BUF", "RBUF"),
    ("CNT", "PCNT"),
    ("COM", "COMM"),
    ("CRA", "AENC"),
    ("EQU", "EQUA"),
    ("ETC", "ETCO"),
    ("GEO", "GEOB"),
    ("IPL", "IPLS"),
    ("LNK", "LINK"),
    ("MCI", "MCDI"),
    ("MLL", "MLLT"),
    ("PIC", "APIC"),
    ("POP", "POPM"),
    ("REV", "RVRB"),
    ("RVA", "RVAD"),
    ("SLT", "SYLT"),
    ("STC", "SYTC"),
    ("TAL", "TALB"),
    ("TBP", "TBPM"),
    ("TCM", "TCOM"),
    ("TCO", "TCON"),
    ("TCP", "TCMP"),
    ("TCR", "TCOP"),
    ("TDA", "TDAT"),
    ("TDY", "TDLY"),
    ("TEN", "TENC"),
    ("TFT", "TFLT"),
    ("TIM", "TIME"),
    ("TKE", "TKEY"),
    ("TLA", "TLAN"),
    ("TLE", "TLEN"),
    ("TMT", "TMED"),
    ("TOA", "TOPE"),
    ("TOF", "TOFN"),
    ("TOL", "TOLY"),
    ("TOR", "TORY"),
    ("TOT", "TOAL"),
    ("TP1", "TPE1"),
    ("TP2", "TPE2"),
    ("TP3", "TPE3"),
    ("TP4", "TPE4"),
    ("TPA", "TPOS"),
    ("TPB", "TPUB"),
    ("TRC", "TSRC"),
    ("TRD", "TRDA"),
    ("TRK", "TRCK"),
    ("TS2", "TSO2"),
    ("TSA", "TSOA"),
    ("TSI", "TSIZ"),
    ("TSP", "TSOP"),
    ("TSS", "TSSE"),
    ("TST", "TSOT"),
    ("TT1", "TIT1"),
    ("TT2", "TIT2"),
    ("TT3", "TIT3"),
    ("TXT", "TEXT"),
    ("TXX", "TXXX"),
    ("TYE", "TYER"),
    ("UFI", "UFID"),
    ("ULT", "USLT"),
    ("WAF", "WOAF"),
    ("WAR", "WOAR"),
    ("WAS", "WOAS"),
    ("WCM", "WCOM"),
    ("WCP", "WCOP"),
    ("WPB", "WPUB"),
    ("WXX", "WXXX"),
];

/// ID3v2.3 identifiers renamed in ID3v2.4
const V23_TO_V24: &[(&str, &str)] = &[("TORY", "TDOR"), ("IPLS", "TIPL")];

/// Composite recording time frame
const RECORDING_TIME: &str = "TDRC";

/// Which part of the recording time a legacy ID3v2.3 frame carries
fn legacy_date_component(id: &str) -> Option<DateComponent> {
    match id {
        "TYER" => Some(DateComponent::Year),
        "TDAT" => Some(DateComponent::Date),
        "TIME" => Some(DateComponent::Time),
        "TRDA" => Some(DateComponent::RecordingDate),
        _ => None,
    }
}

/// Identifier of `id` one version step away, `None` when the target has no equivalent
fn map_id(from: Id3Version, to: Id3Version, id: &str) -> Option<String> {
    let lookup = |table: &[(&str, &str)], forward: bool| {
        table
            .iter()
            .find(|(old, new)| if forward { *old == id } else { *new == id })
            .map(|(old, new)| if forward { new.to_string() } else { old.to_string() })
    };

    match (from, to) {
        (Id3Version::V22, Id3Version::V23) => lookup(V22_TO_V23, true),
        (Id3Version::V23, Id3Version::V22) => lookup(V22_TO_V23, false),
        (Id3Version::V23, Id3Version::V24) => lookup(V23_TO_V24, true).or_else(|| Some(id.to_string())),
        (Id3Version::V24, Id3Version::V23) => lookup(V23_TO_V24, false).or_else(|| Some(id.to_string())),
        _ => None,
    }
}

/// Convert `source` to `target`, leaving `source` untouched
pub fn convert(source: &Id3v2Tag, target: Id3Version) -> Id3v2Tag {
    let mut tag = source.clone();
    while tag.version() != target {
        let next = tag.version().step_towards(target);
        debug!("Converting ID3v{} tag to ID3v{}", tag.version(), next);
        tag = Converter::new(tag.version(), next, &tag).run(&tag);
    }
    tag
}

/// One adjacent version step
struct Converter {
    from: Id3Version,
    to: Id3Version,
    registry: &'static FrameRegistry,
    builder: FrameMapBuilder,
}

/// What to do with a legacy date frame
enum DateMerge {
    Merged,
    Replace,
    Insert,
    Discard,
}

impl Converter {
    fn new(from: Id3Version, to: Id3Version, source: &Id3v2Tag) -> Self {
        let mut builder = FrameMapBuilder::new(to);
        *builder.diagnostics_mut() = source.diagnostics().clone();
        Converter { from, to, registry: FrameRegistry::for_version(to), builder }
    }

    fn run(mut self, source: &Id3v2Tag) -> Id3v2Tag {
        for frame in source.iter() {
            self.push(frame);
        }
        let (frames, diagnostics) = self.builder.finish();
        Id3v2Tag::from_parts(self.to, frames, diagnostics)
    }

    fn discard(&mut self, id: &str, reason: &str) {
        warn!("Discarding frame {} converting ID3v{} to ID3v{}: {}", id, self.from, self.to, reason);
        self.builder.diagnostics_mut().discarded_frame_ids.push(id.to_string());
    }

    fn insert(&mut self, frame: Frame) {
        if let Some(rejected) = self.builder.insert(frame) {
            self.discard(&rejected.id, "identifier already present");
        }
    }

    fn push(&mut self, frame: &Frame) {
        if frame.is_opaque(self.from) {
            self.discard(&frame.id, "compressed or encrypted");
            return;
        }

        if self.from == Id3Version::V23 && self.to == Id3Version::V24 {
            if let (Some(component), FrameBody::Text(text)) = (legacy_date_component(&frame.id), &frame.body) {
                self.merge_date(&frame.id, component, text.first_value());
                return;
            }
        }

        if self.from == Id3Version::V24 && self.to == Id3Version::V23 && frame.id == RECORDING_TIME {
            if let FrameBody::DateTime(date) = &frame.body {
                self.split_date(date);
                return;
            }
        }

        let Some(id) = map_id(self.from, self.to, &frame.id) else {
            self.discard(&frame.id, "no equivalent frame");
            return;
        };
        let body = self.rewrap(&frame.body, &id);
        self.insert(Frame::new(id, body));
    }

    /// Body for the target identifier, reinterpreted where the kind changes
    fn rewrap(&self, body: &FrameBody, id: &str) -> FrameBody {
        let kind = self.registry.kind_of(id);
        match body {
            FrameBody::Unsupported(data) if kind != BodyKind::Unsupported => {
                FrameBody::parse(kind, data, self.to).unwrap_or_else(|| body.clone())
            }
            FrameBody::Text(text) if matches!(id, "TORY" | "TDOR") => {
                let mut text = text.clone();
                text.text = text.first_value().chars().take(4).collect();
                FrameBody::Text(text)
            }
            _ if body.kind() == kind => body.clone(),
            _ => FrameBody::Unsupported(body.to_bytes(self.from)),
        }
    }

    /// Fold a legacy year, date, time or recording date frame into the recording time
    fn merge_date(&mut self, source_id: &str, component: DateComponent, value: &str) {
        let action = match self.builder.slot_mut(RECORDING_TIME) {
            Some(FrameSlot::Single(Frame { body: FrameBody::DateTime(date), .. })) => {
                if date.set_component(component, value) {
                    DateMerge::Merged
                } else {
                    DateMerge::Discard
                }
            }
            Some(FrameSlot::Single(frame)) if frame.body.is_unsupported() => DateMerge::Replace,
            Some(_) => DateMerge::Discard,
            None => DateMerge::Insert,
        };

        match action {
            DateMerge::Merged => debug!("Merged {} into {}", source_id, RECORDING_TIME),
            DateMerge::Discard => self.discard(source_id, "doesn't fit the recording time"),
            DateMerge::Replace | DateMerge::Insert => {
                let mut date = DateTimeBody::default();
                if !date.set_component(component, value) {
                    self.discard(source_id, "malformed value");
                    return;
                }
                let frame = Frame::new(RECORDING_TIME, FrameBody::DateTime(date));
                if matches!(action, DateMerge::Replace) {
                    debug!("Replacing unreadable {} with {}", RECORDING_TIME, source_id);
                    self.builder.replace(frame);
                } else {
                    self.insert(frame);
                }
            }
        }
    }

    /// Break the recording time into the legacy year, date, time and recording date frames
    fn split_date(&mut self, date: &DateTimeBody) {
        if let Some(year) = date.year() {
            self.insert(Frame::text("TYER", year));
        }
        if let Some(day_month) = date.date() {
            self.insert(Frame::text("TDAT", day_month));
        }
        if let Some(time) = date.time() {
            self.insert(Frame::text("TIME", time));
        }
        if let Some(recording_date) = date.recording_date().or(date.unparsed()) {
            self.insert(Frame::text("TRDA", recording_date));
        }
    }
}
