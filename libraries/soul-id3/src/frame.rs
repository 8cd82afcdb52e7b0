//! Frames
//!
//! A single frame loop serves v2.2, v2.3 and v2.4: the version only changes
//! the [`FrameLayout`] (identifier width, size width and encoding, flag
//! bytes). Reading is an explicit state machine so every way a scan can end
//! is a named outcome rather than an error.

use std::borrow::Cow;
use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use flate2::read::ZlibDecoder;

use crate::body::{FieldBody, FrameBody, UnsupportedBody};
use crate::convert::TimestampParts;
use crate::error::{FieldError, Id3Error, Result};
use crate::field::FieldName;
use crate::frame_id::FrameId;
use crate::policy::Policy;
use crate::registry;
use crate::syncsafe;
use crate::version::{FrameLayout, TagVersion};

/// Status and format flags of a v2.3/v2.4 frame header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFlags {
    pub tag_alter_preservation: bool,
    pub file_alter_preservation: bool,
    pub read_only: bool,
    pub grouping: bool,
    pub compression: bool,
    pub encryption: bool,
    pub unsynchronisation: bool,
    pub data_length_indicator: bool,
}

impl FrameFlags {
    pub fn from_bytes(version: TagVersion, bytes: [u8; 2]) -> Self {
        let [status, format] = bytes;
        match version {
            TagVersion::V2_3 => Self {
                tag_alter_preservation: status & 0x80 != 0,
                file_alter_preservation: status & 0x40 != 0,
                read_only: status & 0x20 != 0,
                compression: format & 0x80 != 0,
                encryption: format & 0x40 != 0,
                grouping: format & 0x20 != 0,
                ..Self::default()
            },
            TagVersion::V2_4 => Self {
                tag_alter_preservation: status & 0x40 != 0,
                file_alter_preservation: status & 0x20 != 0,
                read_only: status & 0x10 != 0,
                grouping: format & 0x40 != 0,
                compression: format & 0x08 != 0,
                encryption: format & 0x04 != 0,
                unsynchronisation: format & 0x02 != 0,
                data_length_indicator: format & 0x01 != 0,
            },
            _ => Self::default(),
        }
    }

    /// No format flag changes how the frame data is stored
    pub fn is_plain(self) -> bool {
        !(self.grouping
            || self.compression
            || self.encryption
            || self.unsynchronisation
            || self.data_length_indicator)
    }

    pub fn to_bytes(self, version: TagVersion) -> [u8; 2] {
        let bit = |set: bool, mask: u8| if set { mask } else { 0 };
        match version {
            TagVersion::V2_3 => [
                bit(self.tag_alter_preservation, 0x80)
                    | bit(self.file_alter_preservation, 0x40)
                    | bit(self.read_only, 0x20),
                bit(self.compression, 0x80)
                    | bit(self.encryption, 0x40)
                    | bit(self.grouping, 0x20),
            ],
            TagVersion::V2_4 => [
                bit(self.tag_alter_preservation, 0x40)
                    | bit(self.file_alter_preservation, 0x20)
                    | bit(self.read_only, 0x10),
                bit(self.grouping, 0x40)
                    | bit(self.compression, 0x08)
                    | bit(self.encryption, 0x04)
                    | bit(self.unsynchronisation, 0x02)
                    | bit(self.data_length_indicator, 0x01),
            ],
            _ => [0, 0],
        }
    }
}

/// Where a frame came from when it was produced by conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Renamed or transformed from a single frame of another version
    ConvertedFrom(FrameId),
    /// Folded from separate year/date/time frames
    Timestamp(TimestampParts),
}

/// Header fields as found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub id: FrameId,
    pub size: usize,
    pub flags: FrameFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: FrameId,
    pub flags: FrameFlags,
    pub group_symbol: Option<u8>,
    /// Method symbol of an encrypted frame
    pub encryption_method: Option<u8>,
    /// Decompressed size (v2.3) or data length indicator (v2.4) kept for
    /// encrypted frames, whose payload is written back untouched
    pub data_length: Option<u32>,
    pub body: FrameBody,
    pub provenance: Option<Provenance>,
}

/// Serialised frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedFrame {
    pub bytes: Vec<u8>,
    /// Fields whose text was written with `?` placeholders
    pub substituted: Vec<FieldName>,
}

impl Frame {
    pub fn new(id: FrameId, body: FrameBody) -> Self {
        Self {
            id,
            flags: FrameFlags::default(),
            group_symbol: None,
            encryption_method: None,
            data_length: None,
            body,
            provenance: None,
        }
    }

    /// Frame with an empty body of the layout `id` has in `version`
    pub fn empty(id: FrameId, version: TagVersion) -> Self {
        Self::new(id, registry::create_empty(id, version))
    }

    /// Frame whose body has a main text field holding `text`
    pub fn with_text(id: FrameId, version: TagVersion, text: impl Into<String>) -> Result<Self> {
        let mut frame = Self::empty(id, version);
        frame
            .known_mut()
            .ok_or_else(|| Id3Error::invalid_value(format!("{id} is not a known frame")))?
            .set_text(FieldName::Text, text)
            .map_err(|e| Id3Error::invalid_data(id.as_str(), e))?;
        Ok(frame)
    }

    pub fn known(&self) -> Option<&FieldBody> {
        self.body.as_known()
    }

    pub fn known_mut(&mut self) -> Option<&mut FieldBody> {
        self.body.as_known_mut()
    }

    /// Main text value, for bodies that carry one
    pub fn text(&self) -> Option<&str> {
        self.known().and_then(|b| b.text(FieldName::Text))
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// Serialise header and body for `version`
    ///
    /// The size is recomputed from the current body. Compression and data
    /// length indicators are not written back; encrypted frames keep their
    /// original flags and extra header bytes.
    pub fn encode(&self, version: TagVersion, policy: &Policy) -> Result<EncodedFrame> {
        let layout = version
            .layout()
            .ok_or(Id3Error::UnsupportedVersion(version.major()))?;
        if self.id.len() != layout.id_len {
            return Err(Id3Error::ConversionUnavailable {
                frame: self.id.to_string(),
                target: version,
            });
        }

        let encoded = self
            .body
            .encode(version, &policy.encoding_rules(version))
            .map_err(|e| Id3Error::invalid_data(self.id.as_str(), e))?;
        let mut payload = encoded.bytes;
        let mut flags = self.flags;
        let mut extra = Vec::new();

        if flags.encryption && layout.has_flags {
            self.encrypted_extras(version, &mut extra);
        } else {
            flags.compression = false;
            flags.encryption = false;
            flags.data_length_indicator = false;
            flags.unsynchronisation = false;
            flags.grouping = layout.has_flags && self.group_symbol.is_some();
            if let (true, Some(symbol)) = (flags.grouping, self.group_symbol) {
                extra.push(symbol);
            }
            if version == TagVersion::V2_4
                && policy.unsynchronise
                && syncsafe::needs_unsynchronisation(&payload)
            {
                payload = syncsafe::unsynchronise(&payload);
                flags.unsynchronisation = true;
            }
        }

        let size = extra.len() + payload.len();
        if size > layout.max_frame_size() as usize {
            return Err(Id3Error::TooLarge(size));
        }

        let mut bytes = Vec::with_capacity(layout.header_len() + size);
        bytes.extend_from_slice(self.id.as_bytes());
        if layout.sync_safe_size {
            bytes.extend_from_slice(&syncsafe::encode(size as u32));
        } else {
            bytes.extend_from_slice(&syncsafe::encode_plain(size as u32, layout.size_len));
        }
        if layout.has_flags {
            bytes.extend_from_slice(&flags.to_bytes(version));
        }
        bytes.extend_from_slice(&extra);
        bytes.extend_from_slice(&payload);

        Ok(EncodedFrame {
            bytes,
            substituted: encoded.substituted,
        })
    }

    fn encrypted_extras(&self, version: TagVersion, out: &mut Vec<u8>) {
        let length = self.data_length.unwrap_or_default();
        let method = self.encryption_method.unwrap_or_default();
        if version == TagVersion::V2_3 {
            if self.flags.compression {
                out.extend_from_slice(&length.to_be_bytes());
            }
            out.push(method);
            if let (true, Some(symbol)) = (self.flags.grouping, self.group_symbol) {
                out.push(symbol);
            }
        } else {
            if let (true, Some(symbol)) = (self.flags.grouping, self.group_symbol) {
                out.push(symbol);
            }
            out.push(method);
            if self.flags.data_length_indicator {
                out.extend_from_slice(&syncsafe::encode(length));
            }
        }
    }
}

/// Terminal outcome of reading one frame
#[derive(Debug)]
pub enum FrameRead {
    Done(Frame),
    /// All-zero identifier: the rest of the tag is padding
    PaddingFound,
    /// Identifier bytes outside `[A-Z0-9]`; scanning must stop
    InvalidIdentifier(Vec<u8>),
    /// Declared size 0; the header is skipped
    EmptyFrame(FrameId),
    /// Body failed to decode; the declared size lay inside the tag
    ///
    /// `raw` holds the frame data when no format flag altered it.
    Invalid {
        id: FrameId,
        error: Id3Error,
        raw: Option<Vec<u8>>,
    },
    /// Header or declared size runs past the available bytes
    Truncated { need: usize, have: usize },
}

/// Outcome plus the number of bytes the frame occupied
#[derive(Debug)]
pub struct FrameOutcome {
    pub read: FrameRead,
    pub consumed: usize,
}

impl FrameOutcome {
    fn stop(read: FrameRead) -> Self {
        Self { read, consumed: 0 }
    }
}

enum ReadState {
    ExpectIdentifier,
    ExpectSize { id: FrameId },
    ExpectFlags { id: FrameId, size: usize },
    ExpectBody { header: FrameHeader },
}

/// Reads frames of one version from the frame area of a tag
#[derive(Debug, Clone, Copy)]
pub struct FrameReader {
    version: TagVersion,
    layout: FrameLayout,
    tag_unsynchronised: bool,
}

impl FrameReader {
    pub fn new(version: TagVersion) -> Result<Self> {
        let layout = version
            .layout()
            .ok_or(Id3Error::UnsupportedVersion(version.major()))?;
        Ok(Self {
            version,
            layout,
            tag_unsynchronised: false,
        })
    }

    /// Treat every v2.4 frame as unsynchronised, as the tag flag announces
    pub fn tag_unsynchronised(mut self, yes: bool) -> Self {
        self.tag_unsynchronised = yes;
        self
    }

    /// Read the frame at the start of `buf`
    ///
    /// `buf` ends where the tag's frame area ends, so a declared size that
    /// runs past it is reported instead of over-read.
    pub fn read(&self, buf: &[u8]) -> FrameOutcome {
        let layout = self.layout;
        let header_len = layout.header_len();
        let mut state = ReadState::ExpectIdentifier;

        loop {
            state = match state {
                ReadState::ExpectIdentifier => {
                    let raw = &buf[..layout.id_len.min(buf.len())];
                    if syncsafe::is_all_zero(raw) {
                        return FrameOutcome::stop(FrameRead::PaddingFound);
                    }
                    if !raw.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
                        return FrameOutcome::stop(FrameRead::InvalidIdentifier(raw.to_vec()));
                    }
                    match FrameId::from_bytes(raw).filter(|id| id.len() == layout.id_len) {
                        Some(id) => ReadState::ExpectSize { id },
                        None => {
                            return FrameOutcome::stop(FrameRead::Truncated {
                                need: header_len,
                                have: buf.len(),
                            })
                        }
                    }
                }
                ReadState::ExpectSize { id } => {
                    if buf.len() < header_len {
                        return FrameOutcome::stop(FrameRead::Truncated {
                            need: header_len,
                            have: buf.len(),
                        });
                    }
                    let raw = &buf[layout.id_len..layout.id_len + layout.size_len];
                    let size = if layout.sync_safe_size {
                        self.v24_size(buf, raw)
                    } else {
                        syncsafe::decode_plain(raw)
                    };
                    ReadState::ExpectFlags {
                        id,
                        size: size as usize,
                    }
                }
                ReadState::ExpectFlags { id, size } => {
                    let flags = if layout.has_flags {
                        let at = layout.id_len + layout.size_len;
                        FrameFlags::from_bytes(self.version, [buf[at], buf[at + 1]])
                    } else {
                        FrameFlags::default()
                    };
                    if size == 0 {
                        return FrameOutcome {
                            read: FrameRead::EmptyFrame(id),
                            consumed: header_len,
                        };
                    }
                    if header_len + size > buf.len() {
                        return FrameOutcome::stop(FrameRead::Truncated {
                            need: header_len + size,
                            have: buf.len(),
                        });
                    }
                    ReadState::ExpectBody {
                        header: FrameHeader { id, size, flags },
                    }
                }
                ReadState::ExpectBody { header } => {
                    let consumed = header_len + header.size;
                    let data = &buf[header_len..consumed];
                    let read = match self.decode_body(header, data) {
                        Ok(frame) => FrameRead::Done(frame),
                        Err(error) => FrameRead::Invalid {
                            id: header.id,
                            error,
                            raw: header.flags.is_plain().then(|| data.to_vec()),
                        },
                    };
                    return FrameOutcome { read, consumed };
                }
            };
        }
    }

    /// v2.4 size with the iTunes plain big-endian fallback
    fn v24_size(&self, buf: &[u8], raw: &[u8]) -> u32 {
        let plain = syncsafe::decode_plain(raw);
        if syncsafe::looks_not_sync_safe(raw) {
            tracing::debug!("Frame size {:02X?} is not sync-safe, reading it as plain", raw);
            return plain;
        }
        let sync = syncsafe::decode([raw[0], raw[1], raw[2], raw[3]]);
        if sync == plain {
            return sync;
        }
        let header_len = self.layout.header_len();
        let sync_next = header_len + sync as usize;
        let plain_next = header_len + plain as usize;
        if !self.plausible_boundary(buf, sync_next) && self.plausible_boundary(buf, plain_next) {
            tracing::debug!("Frame size reads as plain {} rather than sync-safe {}", plain, sync);
            return plain;
        }
        sync
    }

    /// Whether a frame ending at `at` is followed by the end of the frame
    /// area, padding, or another valid header
    fn plausible_boundary(&self, buf: &[u8], at: usize) -> bool {
        if at == buf.len() {
            return true;
        }
        let Some(rest) = buf.get(at..) else {
            return false;
        };
        let id = &rest[..self.layout.id_len.min(rest.len())];
        syncsafe::is_all_zero(id) || FrameId::from_bytes(id).is_some_and(|i| i.len() == self.layout.id_len)
    }

    fn decode_body(&self, header: FrameHeader, data: &[u8]) -> Result<Frame> {
        let FrameHeader { id, flags, .. } = header;
        let mut rest = data;
        let mut frame = Frame::new(id, FrameBody::Unsupported(UnsupportedBody { id, data: Vec::new() }));
        frame.flags = flags;

        match self.version {
            TagVersion::V2_3 => {
                if flags.compression {
                    frame.data_length = Some(BigEndian::read_u32(take(&mut rest, 4, id)?));
                }
                if flags.encryption {
                    frame.encryption_method = Some(take(&mut rest, 1, id)?[0]);
                }
                if flags.grouping {
                    frame.group_symbol = Some(take(&mut rest, 1, id)?[0]);
                }
            }
            TagVersion::V2_4 => {
                if flags.grouping {
                    frame.group_symbol = Some(take(&mut rest, 1, id)?[0]);
                }
                if flags.encryption {
                    frame.encryption_method = Some(take(&mut rest, 1, id)?[0]);
                }
                if flags.data_length_indicator {
                    let raw = take(&mut rest, 4, id)?;
                    frame.data_length = Some(syncsafe::decode([raw[0], raw[1], raw[2], raw[3]]));
                }
            }
            _ => {}
        }

        if flags.encryption {
            tracing::debug!("Keeping encrypted frame {} opaque", id);
            frame.body = FrameBody::Unsupported(UnsupportedBody {
                id,
                data: rest.to_vec(),
            });
            return Ok(frame);
        }

        let mut payload = Cow::Borrowed(rest);
        if self.version == TagVersion::V2_4 && (flags.unsynchronisation || self.tag_unsynchronised)
        {
            payload = Cow::Owned(syncsafe::resynchronise(&payload));
        }
        if flags.compression {
            let inflated = inflate(&payload).map_err(|e| Id3Error::invalid_data(id.as_str(), e))?;
            if let Some(expected) = frame.data_length {
                if expected as usize != inflated.len() {
                    tracing::debug!(
                        "Frame {} inflated to {} bytes, header announced {}",
                        id,
                        inflated.len(),
                        expected
                    );
                }
            }
            payload = Cow::Owned(inflated);
        }

        frame.data_length = None;
        frame.body = registry::create(id, &payload, self.version)?;
        Ok(frame)
    }
}

fn take<'a>(rest: &mut &'a [u8], n: usize, id: FrameId) -> Result<&'a [u8]> {
    if rest.len() < n {
        return Err(Id3Error::invalid_data(
            id.as_str(),
            FieldError::Truncated {
                need: n,
                have: rest.len(),
            },
        ));
    }
    let (head, tail) = rest.split_at(n);
    *rest = tail;
    Ok(head)
}

fn inflate(data: &[u8]) -> std::result::Result<Vec<u8>, FieldError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| FieldError::Decompression(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn reader(version: TagVersion) -> FrameReader {
        FrameReader::new(version).unwrap()
    }

    fn done(outcome: FrameOutcome) -> Frame {
        match outcome.read {
            FrameRead::Done(frame) => frame,
            other => panic!("expected a frame, got {:?}", other),
        }
    }

    #[test]
    fn flag_bits_per_version() {
        let flags = FrameFlags::from_bytes(TagVersion::V2_4, [0x60, 0x4B]);
        assert!(flags.tag_alter_preservation && flags.file_alter_preservation);
        assert!(flags.grouping && flags.compression && flags.data_length_indicator);
        assert!(flags.unsynchronisation && !flags.encryption);
        assert_eq!(flags.to_bytes(TagVersion::V2_4), [0x60, 0x4B]);

        let flags = FrameFlags::from_bytes(TagVersion::V2_3, [0x20, 0xE0]);
        assert!(flags.read_only && flags.compression && flags.encryption && flags.grouping);
        assert_eq!(flags.to_bytes(TagVersion::V2_3), [0x20, 0xE0]);
    }

    #[test]
    fn reads_v23_text_frame() {
        let buf = b"TIT2\x00\x00\x00\x06\x00\x00\x00Title\x00\x00";
        let outcome = reader(TagVersion::V2_3).read(buf);
        assert_eq!(outcome.consumed, 16);
        assert_eq!(done(outcome).text(), Some("Title"));
    }

    #[test]
    fn reads_v22_frame() {
        let buf = b"TT2\x00\x00\x04\x00abc";
        let frame = done(reader(TagVersion::V2_2).read(buf));
        assert_eq!(frame.id, "TT2");
        assert_eq!(frame.text(), Some("abc"));
    }

    #[test]
    fn padding_and_invalid_identifiers_are_distinct() {
        let r = reader(TagVersion::V2_4);
        assert!(matches!(r.read(&[0; 20]).read, FrameRead::PaddingFound));
        assert!(matches!(r.read(&[0; 3]).read, FrameRead::PaddingFound));
        assert!(matches!(
            r.read(b"TI\x00\x00\x00\x00\x00\x01\x00\x00x").read,
            FrameRead::InvalidIdentifier(_)
        ));
        assert!(matches!(
            r.read(b"tit2\x00\x00\x00\x01\x00\x00x").read,
            FrameRead::InvalidIdentifier(_)
        ));
    }

    #[test]
    fn empty_frame_is_skipped() {
        let outcome = reader(TagVersion::V2_3).read(b"TALB\x00\x00\x00\x00\x00\x00TIT2");
        assert!(matches!(outcome.read, FrameRead::EmptyFrame(id) if id == "TALB"));
        assert_eq!(outcome.consumed, 10);
    }

    #[test]
    fn oversize_declaration_is_truncated() {
        let outcome = reader(TagVersion::V2_3).read(b"TIT2\x00\x00\x01\x00\x00\x00\x00abc");
        assert!(matches!(
            outcome.read,
            FrameRead::Truncated { need: 266, have: 14 }
        ));
    }

    #[test]
    fn undecodable_body_is_invalid_but_sized() {
        let outcome = reader(TagVersion::V2_3).read(b"TIT2\x00\x00\x00\x02\x00\x00\x09a");
        assert_eq!(outcome.consumed, 12);
        match outcome.read {
            FrameRead::Invalid { id, raw, .. } => {
                assert_eq!(id, "TIT2");
                assert_eq!(raw, Some(vec![0x09, b'a']));
            }
            other => panic!("expected an invalid frame, got {:?}", other),
        }
    }

    #[test]
    fn v24_plain_size_fallback() {
        let mut buf = b"TIT2\x00\x00\x01\x00\x00\x00\x00".to_vec();
        buf.extend(std::iter::repeat(b'a').take(255));
        buf.extend_from_slice(b"TPE1\x00\x00\x00\x02\x00\x00\x00b");
        let outcome = reader(TagVersion::V2_4).read(&buf);
        assert_eq!(outcome.consumed, 266);
        assert_eq!(done(outcome).text().map(str::len), Some(255));
    }

    #[test]
    fn v24_non_sync_safe_bytes_read_plain() {
        let mut buf = b"TIT2\x00\x00\x00\x80\x00\x00\x00".to_vec();
        buf.extend(std::iter::repeat(b'a').take(127));
        assert_eq!(reader(TagVersion::V2_4).read(&buf).consumed, 138);
    }

    #[test]
    fn compressed_v23_frame_is_inflated() {
        let body = b"\x00Compressed title";
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut buf = b"TIT2".to_vec();
        buf.extend_from_slice(&((compressed.len() + 4) as u32).to_be_bytes());
        buf.extend_from_slice(&[0x00, 0x80]);
        buf.extend_from_slice(&(body.len() as u32).to_be_bytes());
        buf.extend_from_slice(&compressed);

        let frame = done(reader(TagVersion::V2_3).read(&buf));
        assert_eq!(frame.text(), Some("Compressed title"));

        let written = frame.encode(TagVersion::V2_3, &Policy::default()).unwrap();
        assert_eq!(&written.bytes[8..10], &[0, 0]);
        assert_eq!(&written.bytes[10..], body);
    }

    #[test]
    fn v24_unsynchronised_frame_with_length_indicator() {
        let mut buf = b"PRIV".to_vec();
        let data = b"me\x00\xFF\x00\xE0";
        buf.extend_from_slice(&syncsafe::encode((data.len() + 4) as u32));
        buf.extend_from_slice(&[0x00, 0x03]);
        buf.extend_from_slice(&syncsafe::encode(5));
        buf.extend_from_slice(data);

        let frame = done(reader(TagVersion::V2_4).read(&buf));
        assert_eq!(
            frame.known().unwrap().binary(FieldName::Data),
            Some(&[0xFF, 0xE0][..])
        );
    }

    #[test]
    fn encrypted_frames_round_trip_opaque() {
        let buf = b"TIT2\x00\x00\x00\x05\x00\x40\x81\xDE\xAD\xBE\xEF";
        let frame = done(reader(TagVersion::V2_3).read(buf));
        assert!(frame.known().is_none());
        assert_eq!(frame.encryption_method, Some(0x81));
        let written = frame.encode(TagVersion::V2_3, &Policy::default()).unwrap();
        assert_eq!(written.bytes, buf.to_vec());
    }

    #[test]
    fn grouping_symbol_survives() {
        let buf = b"TIT2\x00\x00\x00\x04\x00\x40\x07\x00ab";
        let frame = done(reader(TagVersion::V2_4).read(buf));
        assert_eq!(frame.group_symbol, Some(7));
        assert_eq!(frame.text(), Some("ab"));
        let written = frame.encode(TagVersion::V2_4, &Policy::default()).unwrap();
        assert_eq!(written.bytes, buf.to_vec());
    }

    #[test]
    fn encode_recomputes_size() {
        let id = FrameId::new("TIT2").unwrap();
        let mut frame = Frame::empty(id, TagVersion::V2_4);
        frame
            .known_mut()
            .unwrap()
            .set_text(FieldName::Text, "Longer title")
            .unwrap();
        let written = frame.encode(TagVersion::V2_4, &Policy::default()).unwrap();
        assert_eq!(&written.bytes[4..8], &syncsafe::encode(13));
        assert_eq!(written.bytes.len(), 23);
    }

    #[test]
    fn identifier_width_must_match_version() {
        let frame = Frame::empty(FrameId::new("TT2").unwrap(), TagVersion::V2_2);
        assert!(matches!(
            frame.encode(TagVersion::V2_4, &Policy::default()),
            Err(Id3Error::ConversionUnavailable { .. })
        ));
    }
}
