//! Where tags sit in a file buffer

use std::ops::Range;

use crate::syncsafe;
use crate::tag::HEADER_LEN;
use crate::v1::V1_LEN;

/// Footer length of a v2.4 tag
const FOOTER_LEN: usize = 10;

/// Byte ranges of the tags found in a whole-file buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegion {
    /// ID3v2 tag at offset 0, header through footer
    pub v2: Option<Range<usize>>,
    /// ID3v1 trailer in the last 128 bytes
    pub v1: Option<Range<usize>>,
}

impl TagRegion {
    /// Bytes between the tags
    pub fn audio(&self, len: usize) -> Range<usize> {
        let start = self.v2.as_ref().map_or(0, |r| r.end);
        let end = self.v1.as_ref().map_or(len, |r| r.start);
        start..end.max(start)
    }

    /// Space the v2 tag occupies, suitable as a writer size hint
    pub fn v2_len(&self) -> Option<u32> {
        self.v2.as_ref().map(|r| r.len() as u32)
    }
}

/// Find the v2 tag (at offset 0 only) and the v1 trailer
pub fn tag_region(buf: &[u8]) -> TagRegion {
    let mut region = TagRegion::default();

    if buf.len() >= HEADER_LEN && buf.starts_with(b"ID3") && (2..=4).contains(&buf[3]) {
        let size = syncsafe::decode([buf[6], buf[7], buf[8], buf[9]]) as usize;
        let footer = if buf[3] == 4 && buf[5] & 0x10 != 0 {
            FOOTER_LEN
        } else {
            0
        };
        let end = (HEADER_LEN + size + footer).min(buf.len());
        region.v2 = Some(0..end);
    }

    if buf.len() >= V1_LEN {
        let start = buf.len() - V1_LEN;
        let after_v2 = region.v2.as_ref().map_or(true, |r| r.end <= start);
        if after_v2 && buf[start..].starts_with(b"TAG") {
            region.v1 = Some(start..buf.len());
        }
    }

    tracing::trace!("Located tags: {:?}", region);
    region
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(v2_body: usize, footer: bool, audio: usize, v1: bool) -> Vec<u8> {
        let mut out = vec![b'I', b'D', b'3', 4, 0, if footer { 0x10 } else { 0 }];
        out.extend_from_slice(&syncsafe::encode(v2_body as u32));
        out.resize(out.len() + v2_body, 0);
        if footer {
            out.extend_from_slice(b"3DI\x04\x00\x10");
            out.extend_from_slice(&syncsafe::encode(v2_body as u32));
        }
        out.resize(out.len() + audio, 0xAA);
        if v1 {
            out.extend_from_slice(b"TAG");
            out.resize(out.len() + 125, 0);
        }
        out
    }

    #[test]
    fn finds_both_tags() {
        let buf = file(100, false, 500, true);
        let region = tag_region(&buf);
        assert_eq!(region.v2, Some(0..110));
        assert_eq!(region.v1, Some(610..738));
        assert_eq!(region.audio(buf.len()), 110..610);
        assert_eq!(region.v2_len(), Some(110));
    }

    #[test]
    fn footer_counts_towards_the_tag() {
        let buf = file(50, true, 20, false);
        let region = tag_region(&buf);
        assert_eq!(region.v2, Some(0..70));
        assert_eq!(region.audio(buf.len()), 70..90);
    }

    #[test]
    fn bare_audio() {
        let buf = vec![0xAA; 300];
        let region = tag_region(&buf);
        assert_eq!(region, TagRegion::default());
        assert_eq!(region.audio(300), 0..300);
    }
}
