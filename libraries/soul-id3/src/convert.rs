//! Cross-version frame conversion
//!
//! Conversion happens between adjacent versions (v2.2 ⇄ v2.3 ⇄ v2.4); a
//! non-adjacent conversion chains the steps. A step maps one frame to zero,
//! one or several frames. Frames that must be combined (year/date/time into
//! a single v2.4 timestamp, TIPL and TMCL into IPLS) are held in the step
//! until [`Converter::finish`].

use crate::body::{BodyKind, EncodingRules, FieldBody, FrameBody, UnsupportedBody};
use crate::error::{FieldError, Id3Error, Result};
use crate::field::{FieldName, FieldValue};
use crate::frame::{Frame, Provenance};
use crate::frame_id::FrameId;
use crate::genre;
use crate::registry;
use crate::tag::Tag;
use crate::version::TagVersion;

/// v2.2 identifiers and their v2.3 equivalents
const V22_V23: &[(&str, &str)] = &[
    ("BUF", "RBUF"),
    ("CNT", "PCNT"),
    ("COM", "COMM"),
    ("CRA", "AENC"),
    ("ETC", "ETCO"),
    ("EQU", "EQUA"),
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
    ("TSI", "TSIZ"),
    ("TSS", "TSSE"),
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
    ("TCP", "TCMP"),
    ("TS2", "TSO2"),
    ("TSC", "TSOC"),
    ("TSA", "TSOA"),
    ("TSP", "TSOP"),
    ("TST", "TSOT"),
    ("GP1", "GRP1"),
    ("MVN", "MVNM"),
    ("MVI", "MVIN"),
];

pub fn v22_to_v23(id: &str) -> Option<&'static str> {
    V22_V23.iter().find(|(old, _)| *old == id).map(|(_, new)| *new)
}

pub fn v23_to_v22(id: &str) -> Option<&'static str> {
    V22_V23.iter().find(|(_, new)| *new == id).map(|(old, _)| *old)
}

/// Which fragments a v2.4 timestamp was folded from, with their raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampParts {
    /// TYER, `YYYY`
    pub year: Option<String>,
    /// TDAT, `DDMM`
    pub date: Option<String>,
    /// TIME, `HHMM`
    pub time: Option<String>,
}

/// Folds TYER/TDAT/TIME into one TDRC
///
/// Adding fragments is commutative and idempotent: the first value seen
/// for each fragment is kept.
#[derive(Debug, Clone, Default)]
pub struct TimestampAccumulator {
    parts: TimestampParts,
    sources: Vec<FrameId>,
}

/// Result of folding the collected fragments
#[derive(Debug, Default)]
pub struct TimestampFold {
    pub frame: Option<Frame>,
    /// Fragments that could not be placed in the timestamp
    pub unavailable: Vec<FrameId>,
}

impl TimestampAccumulator {
    /// Whether `id` is one of the fragments this accumulator folds
    pub fn accepts(id: &str) -> bool {
        matches!(id, "TYER" | "TDAT" | "TIME")
    }

    pub fn add(&mut self, id: FrameId, text: &str) {
        let value = text.split('\0').next().unwrap_or_default().trim().to_string();
        let slot = match id.as_str() {
            "TYER" => &mut self.parts.year,
            "TDAT" => &mut self.parts.date,
            "TIME" => &mut self.parts.time,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
        if !self.sources.contains(&id) {
            self.sources.push(id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Build the TDRC frame and reset
    ///
    /// A year is required; a time is only used together with a date.
    pub fn finish(&mut self) -> TimestampFold {
        let parts = std::mem::take(&mut self.parts);
        let sources = std::mem::take(&mut self.sources);
        let source = |name: &str| sources.iter().copied().find(|id| *id == name);
        let mut fold = TimestampFold::default();
        if sources.is_empty() {
            return fold;
        }

        let year = parts.year.as_deref().and_then(valid_year);
        let Some(year) = year else {
            fold.unavailable = sources.clone();
            return fold;
        };

        let date = parts.date.as_deref().filter(|d| is_digits(d, 4));
        if parts.date.is_some() && date.is_none() {
            fold.unavailable.extend(source("TDAT"));
        }
        let time = parts.time.as_deref().filter(|t| is_digits(t, 4));
        let time = match (time, date) {
            (Some(t), Some(_)) => Some(t),
            _ => {
                if parts.time.is_some() {
                    fold.unavailable.extend(source("TIME"));
                }
                None
            }
        };

        let mut text = year.to_string();
        if let Some(d) = date {
            text.push_str(&format!("-{}-{}", &d[2..4], &d[0..2]));
        }
        if let Some(t) = time {
            text.push_str(&format!("T{}:{}", &t[0..2], &t[2..4]));
        }

        let used = TimestampParts {
            year: parts.year.clone(),
            date: date.map(str::to_string),
            time: time.map(str::to_string),
        };
        if let Ok(id) = FrameId::new("TDRC") {
            fold.frame = Frame::with_text(id, TagVersion::V2_4, text)
                .ok()
                .map(|f| f.with_provenance(Provenance::Timestamp(used)));
        }
        fold
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn valid_year(text: &str) -> Option<&str> {
    text.get(..4).filter(|y| is_digits(y, 4))
}

/// Components of a v2.4 timestamp `YYYY[-MM[-DD[THH[:MM[:SS]]]]]`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Timestamp<'a> {
    year: &'a str,
    month_day: Option<(&'a str, &'a str)>,
    hour_minute: Option<(&'a str, &'a str)>,
}

fn parse_timestamp(text: &str) -> Option<Timestamp<'_>> {
    let text = text.split('\0').next()?.trim();
    let year = valid_year(text)?;
    let two = |from: usize| text.get(from..from + 2).filter(|s| is_digits(s, 2));
    let sep = |at: usize, c: &str| text.get(at..at + 1) == Some(c);

    let month_day = match (sep(4, "-"), two(5), sep(7, "-"), two(8)) {
        (true, Some(m), true, Some(d)) => Some((m, d)),
        _ => None,
    };
    let hour_minute = match (month_day, sep(10, "T"), two(11), sep(13, ":"), two(14)) {
        (Some(_), true, Some(h), true, Some(m)) => Some((h, m)),
        _ => None,
    };
    Some(Timestamp {
        year,
        month_day,
        hour_minute,
    })
}

/// Split a TDRC frame back into the v2.3 fragments it was made of
///
/// Without provenance every fragment the timestamp can fill is produced.
pub fn split_timestamp(frame: &Frame) -> Option<Vec<Frame>> {
    let timestamp = parse_timestamp(frame.text()?)?;
    let (want_date, want_time) = match &frame.provenance {
        Some(Provenance::Timestamp(parts)) => (parts.date.is_some(), parts.time.is_some()),
        _ => (true, true),
    };

    let mut fragments = vec![("TYER", timestamp.year.to_string())];
    if let (true, Some((month, day))) = (want_date, timestamp.month_day) {
        fragments.push(("TDAT", format!("{day}{month}")));
    }
    if let (true, Some((hour, minute))) = (want_time, timestamp.hour_minute) {
        fragments.push(("TIME", format!("{hour}{minute}")));
    }

    fragments
        .into_iter()
        .map(|(id, text)| {
            let id = FrameId::new(id).ok()?;
            Frame::with_text(id, TagVersion::V2_3, text)
                .ok()
                .map(|f| f.with_provenance(Provenance::ConvertedFrom(frame.id)))
        })
        .collect()
}

/// Outcome of converting a tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Frames produced in the target version
    pub converted: usize,
    /// Source frames with no equivalent in the target version
    pub unavailable: Vec<FrameId>,
    /// Produced frames dropped because a non-repeatable frame already existed
    pub duplicates: usize,
}

enum Outcome {
    Emit(Vec<Frame>),
    Absorbed,
    Unavailable,
}

/// One adjacent-version conversion
struct Step {
    from: TagVersion,
    to: TagVersion,
    timestamp: TimestampAccumulator,
    people: Option<(FieldBody, FrameId)>,
}

impl Step {
    fn new(from: TagVersion, to: TagVersion) -> Self {
        Self {
            from,
            to,
            timestamp: TimestampAccumulator::default(),
            people: None,
        }
    }

    fn convert(&mut self, frame: &Frame, report: &mut ConversionReport) -> Vec<Frame> {
        let outcome = match (self.from, self.to) {
            (TagVersion::V2_2, TagVersion::V2_3) => self.from_v22(frame),
            (TagVersion::V2_3, TagVersion::V2_2) => self.to_v22(frame),
            (TagVersion::V2_3, TagVersion::V2_4) => self.to_v24(frame),
            (TagVersion::V2_4, TagVersion::V2_3) => self.from_v24(frame),
            _ => Outcome::Unavailable,
        };
        match outcome {
            Outcome::Emit(frames) => frames,
            Outcome::Absorbed => Vec::new(),
            Outcome::Unavailable => {
                tracing::warn!("{} frame has no equivalent in {}, dropping it", frame.id, self.to);
                report.unavailable.push(frame.id);
                Vec::new()
            }
        }
    }

    fn finish(&mut self, report: &mut ConversionReport) -> Vec<Frame> {
        let mut out = Vec::new();
        if !self.timestamp.is_empty() {
            let fold = self.timestamp.finish();
            for id in fold.unavailable {
                tracing::warn!("{} cannot be placed in a timestamp, dropping it", id);
                report.unavailable.push(id);
            }
            out.extend(fold.frame);
        }
        if let Some((mut body, source)) = self.people.take() {
            renegotiate(&mut body, self.to);
            if let Ok(id) = FrameId::new("IPLS") {
                out.push(Frame::new(id, FrameBody::Known(body)).with_provenance(Provenance::ConvertedFrom(source)));
            }
        }
        out
    }

    fn from_v22(&mut self, frame: &Frame) -> Outcome {
        match frame.id.as_str() {
            "PIC" => self.transform(frame, "APIC", picture_from_v22),
            "LNK" => self.transform(frame, "LINK", |b| link_remap(b, v22_to_v23)),
            id => match v22_to_v23(id) {
                Some(target) => self.rename(frame, target),
                None => Outcome::Unavailable,
            },
        }
    }

    fn to_v22(&mut self, frame: &Frame) -> Outcome {
        match frame.id.as_str() {
            "APIC" => self.transform(frame, "PIC", picture_to_v22),
            "LINK" => self.transform(frame, "LNK", |b| link_remap(b, v23_to_v22)),
            id => match v23_to_v22(id) {
                Some(target) => self.rename(frame, target),
                None => Outcome::Unavailable,
            },
        }
    }

    fn to_v24(&mut self, frame: &Frame) -> Outcome {
        let id = frame.id.as_str();
        if TimestampAccumulator::accepts(id) {
            return match frame.text() {
                Some(text) => {
                    self.timestamp.add(frame.id, text);
                    Outcome::Absorbed
                }
                None => Outcome::Unavailable,
            };
        }
        match id {
            "TORY" => self.transform(frame, "TDOR", |b| Ok(b.clone())),
            "IPLS" => self.rename(frame, "TIPL"),
            "TCON" => self.transform(frame, "TCON", |b| map_text(b, genre::v23_to_v24)),
            _ => self.rename(frame, id),
        }
    }

    fn from_v24(&mut self, frame: &Frame) -> Outcome {
        match frame.id.as_str() {
            "TDRC" => match split_timestamp(frame) {
                Some(fragments) => Outcome::Emit(fragments),
                None => Outcome::Unavailable,
            },
            "TDOR" => self.transform(frame, "TORY", |b| {
                map_text(b, |t| t.chars().take(4).collect())
            }),
            "TIPL" | "TMCL" => match frame.known() {
                Some(body) => {
                    self.merge_people(frame.id, body);
                    Outcome::Absorbed
                }
                None => Outcome::Unavailable,
            },
            "TCON" => self.transform(frame, "TCON", |b| map_text(b, genre::v24_to_v23)),
            id => self.rename(frame, id),
        }
    }

    fn merge_people(&mut self, source: FrameId, body: &FieldBody) {
        let incoming = body.pairs(FieldName::People).unwrap_or_default().to_vec();
        match &mut self.people {
            Some((merged, _)) => {
                let mut pairs = merged.pairs(FieldName::People).unwrap_or_default().to_vec();
                pairs.extend(incoming);
                if merged.set(FieldName::People, FieldValue::Pairs(pairs)).is_err() {
                    tracing::debug!("Could not merge {} into IPLS", source);
                }
            }
            None => self.people = Some((body.clone(), source)),
        }
    }

    /// Same body layout under a new (or the same) identifier
    fn rename(&self, frame: &Frame, target: &str) -> Outcome {
        let Ok(new_id) = FrameId::new(target) else {
            return Outcome::Unavailable;
        };
        if new_id.len() != self.to.id_width() {
            return Outcome::Unavailable;
        }
        match &frame.body {
            FrameBody::Unsupported(raw) => {
                let known_in_source = registry::lookup(self.from, frame.id.as_str()).is_some();
                let known_in_target = registry::lookup(self.to, target).is_some();
                let flags_lost = frame.flags.encryption && self.to == TagVersion::V2_2;
                if (known_in_source && !known_in_target) || flags_lost {
                    return Outcome::Unavailable;
                }
                let body = FrameBody::Unsupported(UnsupportedBody {
                    id: new_id,
                    data: raw.data.clone(),
                });
                Outcome::Emit(vec![self.rebuild(frame, new_id, body)])
            }
            FrameBody::Known(body) => match registry::lookup(self.to, target) {
                Some(info) if info.kind == body.kind() => {
                    let mut body = body.clone();
                    renegotiate(&mut body, self.to);
                    Outcome::Emit(vec![self.rebuild(frame, new_id, FrameBody::Known(body))])
                }
                _ => Outcome::Unavailable,
            },
        }
    }

    /// New body built from the old one
    fn transform(
        &self,
        frame: &Frame,
        target: &str,
        build: impl Fn(&FieldBody) -> std::result::Result<FieldBody, FieldError>,
    ) -> Outcome {
        let (Ok(new_id), Some(body)) = (FrameId::new(target), frame.known()) else {
            return Outcome::Unavailable;
        };
        match build(body) {
            Ok(mut body) => {
                renegotiate(&mut body, self.to);
                Outcome::Emit(vec![self.rebuild(frame, new_id, FrameBody::Known(body))])
            }
            Err(e) => {
                tracing::debug!("Cannot convert {} to {}: {}", frame.id, target, e);
                Outcome::Unavailable
            }
        }
    }

    fn rebuild(&self, frame: &Frame, id: FrameId, body: FrameBody) -> Frame {
        let provenance = match &frame.provenance {
            Some(p) => Some(p.clone()),
            None if id != frame.id => Some(Provenance::ConvertedFrom(frame.id)),
            None => None,
        };
        let has_flags = self.to != TagVersion::V2_2;
        Frame {
            id,
            flags: if has_flags {
                frame.flags
            } else {
                Default::default()
            },
            group_symbol: frame.group_symbol.filter(|_| has_flags),
            encryption_method: frame.encryption_method,
            data_length: frame.data_length,
            body,
            provenance,
        }
    }
}

/// Make the stored encoding legal for `version` without losing characters
fn renegotiate(body: &mut FieldBody, version: TagVersion) {
    if body.kind().has_encoding() {
        let encoding = body.negotiated_encoding(version, &EncodingRules::default());
        body.set_encoding(encoding);
    }
}

fn map_text(body: &FieldBody, f: impl Fn(&str) -> String) -> std::result::Result<FieldBody, FieldError> {
    let mut out = body.clone();
    let text = body.text(FieldName::Text).unwrap_or_default();
    out.set_text(FieldName::Text, f(text))?;
    Ok(out)
}

fn copy_fields(
    from: &FieldBody,
    to: &mut FieldBody,
    names: &[FieldName],
) -> std::result::Result<(), FieldError> {
    for name in names {
        if let Some(value) = from.get(*name) {
            to.set(*name, value.clone())?;
        }
    }
    Ok(())
}

const PICTURE_FIELDS: &[FieldName] = &[
    FieldName::TextEncoding,
    FieldName::PictureType,
    FieldName::Description,
    FieldName::PictureData,
];

/// v2.2 three-letter image format to MIME type
pub fn mime_for_image_format(format: &str) -> String {
    match format.to_ascii_uppercase().as_str() {
        "JPG" | "JPEG" => "image/jpeg".to_string(),
        "PNG" => "image/png".to_string(),
        "GIF" => "image/gif".to_string(),
        "BMP" => "image/bmp".to_string(),
        "-->" => "-->".to_string(),
        other => format!("image/{}", other.to_ascii_lowercase()),
    }
}

/// MIME type to v2.2 three-letter image format
pub fn image_format_for_mime(mime: &str) -> String {
    match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "JPG".to_string(),
        "image/png" => "PNG".to_string(),
        "image/gif" => "GIF".to_string(),
        "image/bmp" => "BMP".to_string(),
        "-->" => "-->".to_string(),
        other => other
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .chars()
            .take(3)
            .collect::<String>()
            .to_ascii_uppercase(),
    }
}

fn picture_from_v22(body: &FieldBody) -> std::result::Result<FieldBody, FieldError> {
    let mut out = FieldBody::empty(BodyKind::Picture);
    copy_fields(body, &mut out, PICTURE_FIELDS)?;
    let format = body.text(FieldName::ImageFormat).unwrap_or_default();
    out.set_text(FieldName::MimeType, mime_for_image_format(format))?;
    Ok(out)
}

fn picture_to_v22(body: &FieldBody) -> std::result::Result<FieldBody, FieldError> {
    let mut out = FieldBody::empty(BodyKind::PictureV22);
    copy_fields(body, &mut out, PICTURE_FIELDS)?;
    let mime = body.text(FieldName::MimeType).unwrap_or_default();
    out.set_text(FieldName::ImageFormat, image_format_for_mime(mime))?;
    Ok(out)
}

fn link_remap(
    body: &FieldBody,
    map: fn(&str) -> Option<&'static str>,
) -> std::result::Result<FieldBody, FieldError> {
    let mut out = body.clone();
    let linked = body.text(FieldName::LinkedFrame).unwrap_or_default();
    let target = map(linked).ok_or(FieldError::TypeMismatch(FieldName::LinkedFrame.as_str()))?;
    out.set_text(FieldName::LinkedFrame, target)?;
    Ok(out)
}

/// Converts frames from one version to another
pub struct Converter {
    target: TagVersion,
    steps: Vec<Step>,
    report: ConversionReport,
}

impl Converter {
    pub fn new(from: TagVersion, target: TagVersion) -> Result<Self> {
        for version in [from, target] {
            if !version.is_v2() {
                return Err(Id3Error::UnsupportedVersion(version.major()));
            }
        }
        let mut steps = Vec::new();
        let mut at = from;
        while at != target {
            let next = if at < target { up(at) } else { down(at) };
            steps.push(Step::new(at, next));
            at = next;
        }
        Ok(Self {
            target,
            steps,
            report: ConversionReport::default(),
        })
    }

    pub fn target(&self) -> TagVersion {
        self.target
    }

    /// Convert one frame; frames that must be combined come out of
    /// [`Converter::finish`]
    pub fn convert(&mut self, frame: &Frame) -> Vec<Frame> {
        let produced = run_steps(&mut self.steps, vec![frame.clone()], &mut self.report);
        self.report.converted += produced.len();
        produced
    }

    /// Flush combined frames and return the report
    pub fn finish(mut self) -> (Vec<Frame>, ConversionReport) {
        let mut out = Vec::new();
        for i in 0..self.steps.len() {
            let flushed = self.steps[i].finish(&mut self.report);
            let (_, later) = self.steps.split_at_mut(i + 1);
            out.extend(run_steps(later, flushed, &mut self.report));
        }
        self.report.converted += out.len();
        (out, self.report)
    }
}

fn up(version: TagVersion) -> TagVersion {
    match version {
        TagVersion::V2_2 => TagVersion::V2_3,
        _ => TagVersion::V2_4,
    }
}

fn down(version: TagVersion) -> TagVersion {
    match version {
        TagVersion::V2_4 => TagVersion::V2_3,
        _ => TagVersion::V2_2,
    }
}

fn run_steps(steps: &mut [Step], mut frames: Vec<Frame>, report: &mut ConversionReport) -> Vec<Frame> {
    for step in steps {
        let mut next = Vec::with_capacity(frames.len());
        for frame in &frames {
            next.extend(step.convert(frame, report));
        }
        frames = next;
    }
    frames
}

/// Convert a whole tag to `target`
pub fn convert_tag(tag: &Tag, target: TagVersion) -> Result<(Tag, ConversionReport)> {
    let mut converter = Converter::new(tag.version(), target)?;
    let mut out = Tag::new(target);
    out.flags.experimental = tag.flags.experimental;
    out.flags.footer = tag.flags.footer && target == TagVersion::V2_4;
    out.extended_header = tag
        .extended_header
        .as_ref()
        .and_then(|e| e.for_version(target));

    let mut produced = Vec::new();
    for frame in tag.frames() {
        produced.extend(converter.convert(frame));
    }
    let (rest, mut report) = converter.finish();
    produced.extend(rest);

    for frame in produced {
        let id = frame.id;
        if !out.push_frame(frame) {
            tracing::debug!("Dropping duplicate {} produced by conversion", id);
            report.duplicates += 1;
        }
    }
    tracing::info!(
        "Converted {} tag to {}: {} frames, {} unavailable",
        tag.version(),
        target,
        out.len(),
        report.unavailable.len()
    );
    Ok((out, report))
}
