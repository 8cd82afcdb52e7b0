/// Preferred frame order on write
use std::cmp::Ordering;

use crate::convert::v22_to_v23;
use crate::frame::Frame;
use crate::registry;
use crate::version::TagVersion;

/// Frames players look at first come first; large binary frames last
const PRIORITY: &[&str] = &[
    "UFID", "TIT2", "TPE1", "TALB", "TSOA", "TCON", "TCOM", "TPE3", "TIT1", "TRCK", "TPOS",
    "TDRC", "TYER", "TDAT", "TIME", "TORY", "TDOR", "TBPM", "TSRC", "TSOP", "TSOT", "TIT3",
    "TPE2", "TPE4", "TEXT", "TCMP", "TSO2", "TSOC", "TKEY", "TLAN", "TLEN", "TMED", "TMOO",
    "TPUB", "TCOP", "TENC", "TSSE", "TDEN", "TDRL", "TDTG", "IPLS", "TIPL", "TMCL", "TXXX",
    "WXXX", "WOAR", "WOAF", "WOAS", "WCOM", "WCOP", "WORS", "WPAY", "WPUB", "COMM", "USLT",
    "SYLT", "USER", "POPM", "PCNT", "ETCO", "MLLT", "SYTC", "RVA2", "EQU2", "RVAD", "EQUA",
    "RVRB", "RBUF", "MCDI", "LINK", "POSS", "OWNE", "COMR", "ENCR", "GRID", "AENC", "SIGN",
    "SEEK", "ASPI", "GEOB", "PRIV", "APIC",
];

fn is_known(id: &str) -> bool {
    if id.len() == 3 {
        registry::lookup(TagVersion::V2_2, id).is_some()
    } else {
        registry::lookup(TagVersion::V2_3, id).is_some()
            || registry::lookup(TagVersion::V2_4, id).is_some()
    }
}

/// Listed frames by position, then other catalog frames, then unknown ones
fn priority(frame: &Frame) -> usize {
    let id = frame.id.as_str();
    let canonical = v22_to_v23(id).unwrap_or(id);
    match PRIORITY.iter().position(|p| *p == canonical) {
        Some(rank) => rank,
        None if is_known(id) => PRIORITY.len(),
        None => PRIORITY.len() + 1,
    }
}

/// Comparator for the write order: fixed priority, then identifier
///
/// Used with a stable sort so frames sharing an identifier keep their
/// relative order.
pub fn frame_order(a: &Frame, b: &Frame) -> Ordering {
    priority(a)
        .cmp(&priority(b))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_id::FrameId;
    use crate::version::TagVersion;

    fn frame(id: &str, version: TagVersion) -> Frame {
        Frame::empty(FrameId::new(id).unwrap(), version)
    }

    #[test]
    fn orders_by_priority_then_id() {
        let mut frames = vec![
            frame("APIC", TagVersion::V2_4),
            frame("ZZZZ", TagVersion::V2_4),
            frame("TALB", TagVersion::V2_4),
            frame("XAAA", TagVersion::V2_4),
            frame("TIT2", TagVersion::V2_4),
            frame("TOPE", TagVersion::V2_4),
            frame("AAAA", TagVersion::V2_4),
        ];
        frames.sort_by(frame_order);
        let ids: Vec<&str> = frames.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["TIT2", "TALB", "APIC", "TOPE", "AAAA", "XAAA", "ZZZZ"]);
    }

    #[test]
    fn v22_identifiers_share_priorities() {
        let mut frames = vec![frame("TAL", TagVersion::V2_2), frame("TT2", TagVersion::V2_2)];
        frames.sort_by(frame_order);
        assert_eq!(frames[0].id, "TT2");
    }

    #[test]
    fn unlisted_catalog_frames_precede_unknown_ones() {
        let mut frames = vec![
            frame("AAA", TagVersion::V2_2),
            frame("TOA", TagVersion::V2_2),
            frame("TAL", TagVersion::V2_2),
        ];
        frames.sort_by(frame_order);
        let ids: Vec<&str> = frames.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["TAL", "TOA", "AAA"]);
    }
}
