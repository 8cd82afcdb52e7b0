//! Reading a tag from bytes

use std::borrow::Cow;

use serde::Serialize;

use super::header::{ExtendedHeader, TagHeader, HEADER_LEN};
use super::Tag;
use crate::body::{FrameBody, UnsupportedBody};
use crate::error::{Id3Error, Result};
use crate::frame::{Frame, FrameRead, FrameReader};
use crate::policy::Policy;
use crate::syncsafe;
use crate::version::TagVersion;

/// Why the frame scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStop {
    /// Every byte of the frame area was consumed by frames
    Exhausted,
    /// Padding started
    Padding,
    /// A header had an identifier outside `[A-Z0-9]`
    InvalidIdentifier,
    /// A header or declared size ran past the tag
    Truncated,
}

/// What a read skipped, dropped or stopped on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadDiagnostics {
    pub empty_frames: usize,
    pub invalid_frames: usize,
    pub duplicate_frames: usize,
    pub padding_bytes: usize,
    pub stopped_by: Option<ScanStop>,
    /// The extended header carried a CRC that did not match the frames
    pub crc_mismatch: bool,
}

/// Read the tag at the start of `buf` with the default policy
pub fn read_tag(buf: &[u8]) -> Result<Tag> {
    read_tag_with(buf, &Policy::default())
}

/// Read the tag at the start of `buf`
///
/// Only the outer structure can fail the read. Problems inside the frame
/// area end up in [`Tag::diagnostics`].
pub fn read_tag_with(buf: &[u8], policy: &Policy) -> Result<Tag> {
    let header = TagHeader::parse(buf)?;
    let version = header.version;
    if header.flags.compression {
        return Err(Id3Error::UnsupportedFeature(
            "ID3v2.2 tag-level compression".to_string(),
        ));
    }

    let declared_end = HEADER_LEN + header.size as usize;
    let end = if declared_end > buf.len() {
        tracing::warn!(
            "Tag declares {} bytes but only {} are available",
            declared_end,
            buf.len()
        );
        buf.len()
    } else {
        declared_end
    };

    let mut area = Cow::Borrowed(&buf[HEADER_LEN..end]);
    if header.flags.unsynchronisation && version != TagVersion::V2_4 {
        area = Cow::Owned(syncsafe::resynchronise(&area));
    }

    let mut tag = Tag::new(version);
    tag.flags = header.flags;

    let mut start = 0;
    if header.flags.extended_header {
        let (extended, consumed) = ExtendedHeader::parse(version, &area)?;
        start = consumed;
        if let Some(expected) = extended.crc {
            let covered = crc_region(version, &area[start..], &extended);
            if crc32fast::hash(covered) != expected {
                tracing::warn!("Extended header CRC {:#010x} does not match the frames", expected);
                tag.diagnostics.crc_mismatch = true;
            }
        }
        tag.extended_header = Some(extended);
    }

    let reader = FrameReader::new(version)?
        .tag_unsynchronised(version == TagVersion::V2_4 && header.flags.unsynchronisation);
    scan_frames(&mut tag, &reader, &area[start..], policy);

    tracing::debug!(
        "Read {} tag with {} frames ({:?})",
        version,
        tag.len(),
        tag.diagnostics.stopped_by
    );
    Ok(tag)
}

/// v2.3 covers the frames only, v2.4 the frames and padding
fn crc_region<'a>(version: TagVersion, frames: &'a [u8], extended: &ExtendedHeader) -> &'a [u8] {
    match version {
        TagVersion::V2_3 => {
            let padding = (extended.padding_size as usize).min(frames.len());
            &frames[..frames.len() - padding]
        }
        _ => frames,
    }
}

fn scan_frames(tag: &mut Tag, reader: &FrameReader, frames: &[u8], policy: &Policy) {
    let mut offset = 0;
    let stop = loop {
        if offset >= frames.len() {
            break ScanStop::Exhausted;
        }
        let outcome = reader.read(&frames[offset..]);
        match outcome.read {
            FrameRead::Done(frame) => {
                let id = frame.id;
                if !tag.push_frame(frame) {
                    tracing::debug!("Dropping duplicate {} frame", id);
                    tag.diagnostics.duplicate_frames += 1;
                }
            }
            FrameRead::PaddingFound => {
                tag.diagnostics.padding_bytes = frames.len() - offset;
                break ScanStop::Padding;
            }
            FrameRead::InvalidIdentifier(raw) => {
                tracing::warn!(
                    "Invalid frame identifier {:02X?} at offset {}, keeping {} frames",
                    raw,
                    offset,
                    tag.len()
                );
                break ScanStop::InvalidIdentifier;
            }
            FrameRead::EmptyFrame(id) => {
                tracing::debug!("Skipping empty {} frame", id);
                tag.diagnostics.empty_frames += 1;
            }
            FrameRead::Invalid { id, error, raw } => {
                tracing::warn!("Skipping {} frame: {}", id, error);
                tag.diagnostics.invalid_frames += 1;
                if let (true, Some(data)) = (policy.keep_invalid_frames, raw) {
                    tag.push_frame(Frame::new(
                        id,
                        FrameBody::Unsupported(UnsupportedBody { id, data }),
                    ));
                }
            }
            FrameRead::Truncated { need, have } => {
                tracing::warn!(
                    "Frame at offset {} needs {} bytes, {} left in the tag",
                    offset,
                    need,
                    have
                );
                break ScanStop::Truncated;
            }
        }
        offset += outcome.consumed;
    };
    tag.diagnostics.stopped_by = Some(stop);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_bytes(major: u8, flags: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![b'I', b'D', b'3', major, 0, flags];
        out.extend_from_slice(&syncsafe::encode(body.len() as u32));
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn reads_frames_until_padding() {
        let mut body = b"TIT2\x00\x00\x00\x06\x00\x00\x00Title".to_vec();
        body.extend_from_slice(&[0; 32]);
        let tag = read_tag(&tag_bytes(3, 0, &body)).unwrap();
        assert_eq!(tag.len(), 1);
        assert_eq!(tag.diagnostics.padding_bytes, 32);
        assert_eq!(tag.diagnostics.stopped_by, Some(ScanStop::Padding));
    }

    #[test]
    fn invalid_identifier_keeps_earlier_frames() {
        let body = b"TIT2\x00\x00\x00\x02\x00\x00\x00Ax!Y\x00\x00\x00\x01\x00\x00\x00";
        let tag = read_tag(&tag_bytes(3, 0, body)).unwrap();
        assert_eq!(tag.len(), 1);
        assert_eq!(tag.diagnostics.stopped_by, Some(ScanStop::InvalidIdentifier));
    }

    #[test]
    fn duplicates_and_empty_frames_are_counted() {
        let body = b"TIT2\x00\x00\x00\x02\x00\x00\x00A\
TALB\x00\x00\x00\x00\x00\x00\
TIT2\x00\x00\x00\x02\x00\x00\x00B";
        let tag = read_tag(&tag_bytes(3, 0, body)).unwrap();
        assert_eq!(tag.frame("TIT2").unwrap().text(), Some("A"));
        assert_eq!(tag.diagnostics.duplicate_frames, 1);
        assert_eq!(tag.diagnostics.empty_frames, 1);
        assert_eq!(tag.diagnostics.stopped_by, Some(ScanStop::Exhausted));
    }

    #[test]
    fn invalid_frames_are_dropped_or_kept() {
        let body = b"TIT2\x00\x00\x00\x02\x00\x00\x07A\
TPE1\x00\x00\x00\x02\x00\x00\x00B";
        let bytes = tag_bytes(3, 0, body);

        let tag = read_tag(&bytes).unwrap();
        assert_eq!(tag.len(), 1);
        assert_eq!(tag.diagnostics.invalid_frames, 1);

        let policy = Policy {
            keep_invalid_frames: true,
            ..Policy::default()
        };
        let tag = read_tag_with(&bytes, &policy).unwrap();
        assert_eq!(tag.len(), 2);
        assert!(tag.frame("TIT2").unwrap().known().is_none());
    }

    #[test]
    fn tag_level_unsynchronisation_is_reversed() {
        let frame = b"PRIV\x00\x00\x00\x04\x00\x00a\x00\xFF\xE0";
        let tag = read_tag(&tag_bytes(3, 0x80, &syncsafe::unsynchronise(frame))).unwrap();
        let body = tag.frame("PRIV").unwrap().known().unwrap();
        assert_eq!(body.binary(crate::field::FieldName::Data), Some(&[0xFF, 0xE0][..]));
    }

    #[test]
    fn v22_compression_is_unsupported() {
        let bytes = tag_bytes(2, 0x40, &[0; 16]);
        assert!(matches!(read_tag(&bytes), Err(Id3Error::UnsupportedFeature(_))));
    }

    #[test]
    fn crc_mismatch_is_reported() {
        let mut body = vec![0, 0, 0, 10, 0x80, 0, 0, 0, 0, 0, 0xDE, 0xAD, 0xBE, 0xEF];
        body.extend_from_slice(b"TIT2\x00\x00\x00\x02\x00\x00\x00A");
        let tag = read_tag(&tag_bytes(3, 0x40, &body)).unwrap();
        assert!(tag.diagnostics.crc_mismatch);
        assert_eq!(tag.len(), 1);
    }
}
