//! Field type library
//!
//! Every frame body is an ordered list of typed fields. A [`FieldKind`]
//! knows how to size, decode and encode one value; decoding always works on
//! the bytes left in the body so size-terminated kinds can take the rest.

use crate::encoding::{encode_latin1, TextEncoding};
use crate::error::FieldError;
use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

/// Symbolic names of body fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    TextEncoding,
    Text,
    Description,
    Url,
    Language,
    MimeType,
    ImageFormat,
    PictureType,
    PictureData,
    Filename,
    ObjectData,
    Counter,
    Email,
    Rating,
    Owner,
    Identifier,
    Data,
    TimestampFormat,
    ContentType,
    EventData,
    TempoData,
    FramesBetweenReferences,
    BytesBetweenReferences,
    MillisecondsBetweenReferences,
    BitsForBytesDeviation,
    BitsForMillisecondsDeviation,
    DeviationData,
    SyncedText,
    Adjustment,
    Interpolation,
    ReverbLeft,
    ReverbRight,
    BouncesLeft,
    BouncesRight,
    FeedbackLeftToLeft,
    FeedbackLeftToRight,
    FeedbackRightToRight,
    FeedbackRightToLeft,
    PremixLeftToRight,
    PremixRightToLeft,
    BufferSize,
    EmbeddedInfo,
    OffsetToNextTag,
    PreviewStart,
    PreviewLength,
    EncryptionInfo,
    LinkedFrame,
    AdditionalData,
    Position,
    PricePaid,
    PurchaseDate,
    Seller,
    Price,
    ValidUntil,
    ContactUrl,
    ReceivedAs,
    SellerName,
    SellerLogo,
    MethodSymbol,
    GroupSymbol,
    Signature,
    MinimumOffset,
    IndexedDataStart,
    IndexedDataLength,
    IndexPoints,
    BitsPerIndexPoint,
    IndexData,
    People,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextEncoding => "text_encoding",
            Self::Text => "text",
            Self::Description => "description",
            Self::Url => "url",
            Self::Language => "language",
            Self::MimeType => "mime_type",
            Self::ImageFormat => "image_format",
            Self::PictureType => "picture_type",
            Self::PictureData => "picture_data",
            Self::Filename => "filename",
            Self::ObjectData => "object_data",
            Self::Counter => "counter",
            Self::Email => "email",
            Self::Rating => "rating",
            Self::Owner => "owner",
            Self::Identifier => "identifier",
            Self::Data => "data",
            Self::TimestampFormat => "timestamp_format",
            Self::ContentType => "content_type",
            Self::EventData => "event_data",
            Self::TempoData => "tempo_data",
            Self::FramesBetweenReferences => "frames_between_references",
            Self::BytesBetweenReferences => "bytes_between_references",
            Self::MillisecondsBetweenReferences => "milliseconds_between_references",
            Self::BitsForBytesDeviation => "bits_for_bytes_deviation",
            Self::BitsForMillisecondsDeviation => "bits_for_milliseconds_deviation",
            Self::DeviationData => "deviation_data",
            Self::SyncedText => "synced_text",
            Self::Adjustment => "adjustment",
            Self::Interpolation => "interpolation",
            Self::ReverbLeft => "reverb_left",
            Self::ReverbRight => "reverb_right",
            Self::BouncesLeft => "bounces_left",
            Self::BouncesRight => "bounces_right",
            Self::FeedbackLeftToLeft => "feedback_left_to_left",
            Self::FeedbackLeftToRight => "feedback_left_to_right",
            Self::FeedbackRightToRight => "feedback_right_to_right",
            Self::FeedbackRightToLeft => "feedback_right_to_left",
            Self::PremixLeftToRight => "premix_left_to_right",
            Self::PremixRightToLeft => "premix_right_to_left",
            Self::BufferSize => "buffer_size",
            Self::EmbeddedInfo => "embedded_info",
            Self::OffsetToNextTag => "offset_to_next_tag",
            Self::PreviewStart => "preview_start",
            Self::PreviewLength => "preview_length",
            Self::EncryptionInfo => "encryption_info",
            Self::LinkedFrame => "linked_frame",
            Self::AdditionalData => "additional_data",
            Self::Position => "position",
            Self::PricePaid => "price_paid",
            Self::PurchaseDate => "purchase_date",
            Self::Seller => "seller",
            Self::Price => "price",
            Self::ValidUntil => "valid_until",
            Self::ContactUrl => "contact_url",
            Self::ReceivedAs => "received_as",
            Self::SellerName => "seller_name",
            Self::SellerLogo => "seller_logo",
            Self::MethodSymbol => "method_symbol",
            Self::GroupSymbol => "group_symbol",
            Self::Signature => "signature",
            Self::MinimumOffset => "minimum_offset",
            Self::IndexedDataStart => "indexed_data_start",
            Self::IndexedDataLength => "indexed_data_length",
            Self::IndexPoints => "index_points",
            Self::BitsPerIndexPoint => "bits_per_index_point",
            Self::IndexData => "index_data",
            Self::People => "people",
        }
    }
}

/// Codec kind and width rule of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One text encoding byte that governs later encoded strings
    Encoding,
    /// Fixed-width big-endian unsigned integer, 1 to 4 bytes
    UInt(usize),
    /// Big-endian integer over all remaining bytes, at least `min` wide
    VarUInt { min: usize },
    /// ISO-8859-1 string ending in a single `0x00`
    Latin1Terminated,
    /// String in the body encoding ending in its terminator
    EncodedTerminated,
    /// ISO-8859-1 string of exactly this many bytes
    FixedLatin1(usize),
    /// Identifier of another frame, as wide as the version's identifiers
    FrameIdRef,
    /// ISO-8859-1 string taking every remaining byte
    Latin1ToEnd,
    /// Encoded string taking every remaining byte; values separated by the
    /// terminator are kept as `\0` inside the value
    EncodedToEnd,
    /// Alternating key/value list of encoded strings
    PairedText,
    /// Synchronised lyric lines: encoded string, terminator, then a 32-bit
    /// timestamp, repeated to the end of the body
    SyncedEntries,
    /// Raw bytes taking every remaining byte
    BinaryToEnd,
}

impl FieldKind {
    /// Whether this kind consumes the rest of the body
    pub fn is_to_end(self) -> bool {
        matches!(
            self,
            Self::VarUInt { .. }
                | Self::Latin1ToEnd
                | Self::EncodedToEnd
                | Self::PairedText
                | Self::SyncedEntries
                | Self::BinaryToEnd
        )
    }

    /// Whether values of this kind are encoded with the body encoding
    pub fn uses_body_encoding(self) -> bool {
        matches!(
            self,
            Self::EncodedTerminated | Self::EncodedToEnd | Self::PairedText | Self::SyncedEntries
        )
    }

    /// Value of a freshly created field
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Encoding | Self::UInt(_) | Self::VarUInt { .. } => FieldValue::Int(0),
            Self::Latin1Terminated
            | Self::EncodedTerminated
            | Self::FixedLatin1(_)
            | Self::FrameIdRef
            | Self::Latin1ToEnd
            | Self::EncodedToEnd => FieldValue::Text(String::new()),
            Self::PairedText => FieldValue::Pairs(Vec::new()),
            Self::SyncedEntries => FieldValue::Synced(Vec::new()),
            Self::BinaryToEnd => FieldValue::Binary(Vec::new()),
        }
    }
}

/// One entry of a body layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: FieldName, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Decoded value of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(u64),
    Text(String),
    Pairs(Vec<(String, String)>),
    /// Lyric lines with their timestamps
    Synced(Vec<(String, u32)>),
    Binary(Vec<u8>),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pairs(&self) -> Option<&[(String, String)]> {
        match self {
            Self::Pairs(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_synced(&self) -> Option<&[(String, u32)]> {
        match self {
            Self::Synced(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Whether the value has the shape `kind` stores
    pub fn matches(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind.default_value()),
            (Self::Int(_), FieldValue::Int(_))
                | (Self::Text(_), FieldValue::Text(_))
                | (Self::Pairs(_), FieldValue::Pairs(_))
                | (Self::Synced(_), FieldValue::Synced(_))
                | (Self::Binary(_), FieldValue::Binary(_))
        )
    }
}

/// Body-wide state the field codecs consult
#[derive(Debug, Clone, Copy)]
pub struct FieldContext {
    /// Encoding for encoded strings
    pub encoding: TextEncoding,
    /// Identifier width of the owning version (3 or 4)
    pub id_width: usize,
}

impl FieldContext {
    pub fn new(encoding: TextEncoding, id_width: usize) -> Self {
        Self { encoding, id_width }
    }
}

/// Result of encoding one field
#[derive(Debug, Default)]
pub struct Encoded {
    /// Whether characters were replaced by a placeholder
    pub lossy: bool,
}

impl FieldDescriptor {
    /// Decode a value from the remaining body bytes
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn decode(
        &self,
        buf: &[u8],
        ctx: &FieldContext,
    ) -> Result<(FieldValue, usize), FieldError> {
        match self.kind {
            FieldKind::Encoding => {
                let byte = *buf.first().ok_or(FieldError::Truncated { need: 1, have: 0 })?;
                TextEncoding::from_byte(byte).ok_or(FieldError::UnknownEncoding(byte))?;
                Ok((FieldValue::Int(u64::from(byte)), 1))
            }
            FieldKind::UInt(width) => {
                if buf.len() < width {
                    return Err(FieldError::Truncated {
                        need: width,
                        have: buf.len(),
                    });
                }
                Ok((FieldValue::Int(read_be(&buf[..width])), width))
            }
            FieldKind::VarUInt { .. } => {
                let significant = buf.iter().skip_while(|&&b| b == 0).count();
                if significant > 8 {
                    return Err(FieldError::IntegerOverflow(significant));
                }
                Ok((FieldValue::Int(read_be(buf)), buf.len()))
            }
            FieldKind::Latin1Terminated => {
                let (raw, consumed) = split_terminated(buf, TextEncoding::Latin1)?;
                Ok((FieldValue::Text(TextEncoding::Latin1.decode(raw)), consumed))
            }
            FieldKind::EncodedTerminated => {
                let (raw, consumed) = split_terminated(buf, ctx.encoding)?;
                Ok((FieldValue::Text(ctx.encoding.decode(raw)), consumed))
            }
            FieldKind::FixedLatin1(width) => decode_fixed(buf, width),
            FieldKind::FrameIdRef => decode_fixed(buf, ctx.id_width),
            FieldKind::Latin1ToEnd => {
                let text = TextEncoding::Latin1.decode(buf);
                Ok((FieldValue::Text(text.trim_end_matches('\0').to_string()), buf.len()))
            }
            FieldKind::EncodedToEnd => {
                let values = split_values(buf, ctx.encoding)?;
                Ok((FieldValue::Text(values.join("\0")), buf.len()))
            }
            FieldKind::PairedText => {
                let tokens = split_values(buf, ctx.encoding)?;
                Ok((FieldValue::Pairs(pair_tokens(tokens)), buf.len()))
            }
            FieldKind::SyncedEntries => {
                let mut entries = Vec::new();
                let mut rest = buf;
                while !rest.is_empty() {
                    let (raw, consumed) = split_terminated(rest, ctx.encoding)?;
                    rest = &rest[consumed..];
                    if rest.len() < 4 {
                        return Err(FieldError::Truncated {
                            need: 4,
                            have: rest.len(),
                        });
                    }
                    entries.push((ctx.encoding.decode(raw), BigEndian::read_u32(&rest[..4])));
                    rest = &rest[4..];
                }
                Ok((FieldValue::Synced(entries), buf.len()))
            }
            FieldKind::BinaryToEnd => Ok((FieldValue::Binary(buf.to_vec()), buf.len())),
        }
    }

    /// Encoded size of `value`
    pub fn size(&self, value: &FieldValue, ctx: &FieldContext) -> Result<usize, FieldError> {
        let mismatch = FieldError::TypeMismatch(self.name.as_str());
        let size = match (self.kind, value) {
            (FieldKind::Encoding, FieldValue::Int(_)) => 1,
            (FieldKind::UInt(width), FieldValue::Int(_)) => width,
            (FieldKind::VarUInt { min }, FieldValue::Int(v)) => var_width(*v, min),
            (FieldKind::Latin1Terminated, FieldValue::Text(s)) => s.chars().count() + 1,
            (FieldKind::EncodedTerminated, FieldValue::Text(s)) => {
                ctx.encoding.encoded_len(s) + ctx.encoding.terminator().len()
            }
            (FieldKind::FixedLatin1(width), FieldValue::Text(_)) => width,
            (FieldKind::FrameIdRef, FieldValue::Text(_)) => ctx.id_width,
            (FieldKind::Latin1ToEnd, FieldValue::Text(s)) => s.chars().count(),
            (FieldKind::EncodedToEnd, FieldValue::Text(s)) => {
                let values: Vec<&str> = s.split('\0').collect();
                values_len(&values, ctx.encoding, false)
            }
            (FieldKind::PairedText, FieldValue::Pairs(pairs)) => {
                let values: Vec<&str> = pairs
                    .iter()
                    .flat_map(|(k, v)| [k.as_str(), v.as_str()])
                    .collect();
                values_len(&values, ctx.encoding, true)
            }
            (FieldKind::SyncedEntries, FieldValue::Synced(entries)) => entries
                .iter()
                .map(|(text, _)| ctx.encoding.encoded_len(text) + ctx.encoding.terminator().len() + 4)
                .sum(),
            (FieldKind::BinaryToEnd, FieldValue::Binary(b)) => b.len(),
            _ => return Err(mismatch),
        };
        Ok(size)
    }

    /// Append the encoded value to `out`
    pub fn encode(
        &self,
        value: &FieldValue,
        ctx: &FieldContext,
        out: &mut Vec<u8>,
    ) -> Result<Encoded, FieldError> {
        let mut result = Encoded::default();
        match (self.kind, value) {
            (FieldKind::Encoding, FieldValue::Int(_)) => out.push(ctx.encoding.as_byte()),
            (FieldKind::UInt(width), FieldValue::Int(v)) => {
                if width < 8 && *v >> (width * 8) != 0 {
                    return Err(FieldError::ValueTooWide { value: *v, width });
                }
                write_be(out, *v, width);
            }
            (FieldKind::VarUInt { min }, FieldValue::Int(v)) => {
                write_be(out, *v, var_width(*v, min));
            }
            (FieldKind::Latin1Terminated, FieldValue::Text(s)) => {
                let (bytes, lossy) = encode_latin1(s);
                out.extend_from_slice(&bytes);
                out.push(0);
                result.lossy = lossy;
            }
            (FieldKind::EncodedTerminated, FieldValue::Text(s)) => {
                let (bytes, lossy) = ctx.encoding.encode(s);
                out.extend_from_slice(&bytes);
                out.extend_from_slice(ctx.encoding.terminator());
                result.lossy = lossy;
            }
            (FieldKind::FixedLatin1(width), FieldValue::Text(s)) => {
                result.lossy = encode_fixed(out, s, width);
            }
            (FieldKind::FrameIdRef, FieldValue::Text(s)) => {
                result.lossy = encode_fixed(out, s, ctx.id_width);
            }
            (FieldKind::Latin1ToEnd, FieldValue::Text(s)) => {
                let (bytes, lossy) = encode_latin1(s);
                out.extend_from_slice(&bytes);
                result.lossy = lossy;
            }
            (FieldKind::EncodedToEnd, FieldValue::Text(s)) => {
                let values: Vec<&str> = s.split('\0').collect();
                result.lossy = encode_values(out, &values, ctx.encoding, false);
            }
            (FieldKind::PairedText, FieldValue::Pairs(pairs)) => {
                let values: Vec<&str> = pairs
                    .iter()
                    .flat_map(|(k, v)| [k.as_str(), v.as_str()])
                    .collect();
                result.lossy = encode_values(out, &values, ctx.encoding, true);
            }
            (FieldKind::SyncedEntries, FieldValue::Synced(entries)) => {
                for (text, timestamp) in entries {
                    let (bytes, lossy) = ctx.encoding.encode(text);
                    result.lossy |= lossy;
                    out.extend_from_slice(&bytes);
                    out.extend_from_slice(ctx.encoding.terminator());
                    out.extend_from_slice(&timestamp.to_be_bytes());
                }
            }
            (FieldKind::BinaryToEnd, FieldValue::Binary(b)) => out.extend_from_slice(b),
            _ => return Err(FieldError::TypeMismatch(self.name.as_str())),
        }
        Ok(result)
    }
}

fn read_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Append the low `width` bytes of `value`, big-endian
fn write_be(out: &mut Vec<u8>, value: u64, width: usize) {
    let bytes = value.to_be_bytes();
    out.resize(out.len() + width.saturating_sub(bytes.len()), 0);
    out.extend_from_slice(&bytes[bytes.len().saturating_sub(width)..]);
}

/// Bytes needed for a variable-length integer: at least `min`, growing by
/// whole bytes when the value overflows
fn var_width(value: u64, min: usize) -> usize {
    let needed = (64 - value.leading_zeros() as usize).div_ceil(8);
    needed.max(min)
}

/// Find the terminator of a string in `buf`
///
/// Wide encodings scan 2-byte aligned code units. A missing terminator in an
/// otherwise well-formed buffer takes the whole remainder.
fn split_terminated(buf: &[u8], encoding: TextEncoding) -> Result<(&[u8], usize), FieldError> {
    if encoding.is_wide() {
        let mut i = 0;
        while i + 1 < buf.len() {
            if buf[i] == 0 && buf[i + 1] == 0 {
                return Ok((&buf[..i], i + 2));
            }
            i += 2;
        }
        if i < buf.len() {
            return Err(FieldError::OddUtf16Length);
        }
        Ok((buf, buf.len()))
    } else {
        match buf.iter().position(|&b| b == 0) {
            Some(pos) => Ok((&buf[..pos], pos + 1)),
            None => Ok((buf, buf.len())),
        }
    }
}

/// Split terminator-separated strings, dropping the empty value produced by
/// a trailing terminator
fn split_values(buf: &[u8], encoding: TextEncoding) -> Result<Vec<String>, FieldError> {
    let mut values = Vec::new();
    let mut rest = buf;
    // A BOM-less UTF-16 continuation value inherits the byte order of the first
    let mut inherited: Option<TextEncoding> = None;
    while !rest.is_empty() {
        let (raw, consumed) = split_terminated(rest, encoding)?;
        let value = match (encoding, inherited) {
            (TextEncoding::Utf16, Some(order)) if !has_bom(raw) => order.decode(raw),
            _ => encoding.decode(raw),
        };
        if encoding == TextEncoding::Utf16 && inherited.is_none() {
            inherited = Some(if raw.starts_with(&[0xFE, 0xFF]) {
                TextEncoding::Utf16Be
            } else {
                TextEncoding::Utf16
            });
        }
        values.push(value);
        rest = &rest[consumed..];
    }
    while values.len() > 1 && values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
    Ok(values)
}

fn has_bom(raw: &[u8]) -> bool {
    raw.starts_with(&[0xFF, 0xFE]) || raw.starts_with(&[0xFE, 0xFF])
}

/// Group tokens into key/value pairs
///
/// An odd trailing key gets an empty value; a lone token becomes a key with
/// no value, which is how older writers store a single involvement.
fn pair_tokens(tokens: Vec<String>) -> Vec<(String, String)> {
    let tokens: Vec<String> = if tokens.len() == 1 && tokens[0].is_empty() {
        Vec::new()
    } else {
        tokens
    };
    let mut pairs = Vec::with_capacity(tokens.len() / 2 + 1);
    let mut iter = tokens.into_iter();
    while let Some(key) = iter.next() {
        let value = iter.next().unwrap_or_default();
        pairs.push((key, value));
    }
    pairs
}

fn values_len(values: &[&str], encoding: TextEncoding, terminate_last: bool) -> usize {
    let term = encoding.terminator().len();
    let body: usize = values.iter().map(|v| encoding.encoded_len(v)).sum();
    let separators = if terminate_last {
        values.len()
    } else {
        values.len().saturating_sub(1)
    };
    body + separators * term
}

fn encode_values(
    out: &mut Vec<u8>,
    values: &[&str],
    encoding: TextEncoding,
    terminate_last: bool,
) -> bool {
    let mut lossy = false;
    for (i, value) in values.iter().enumerate() {
        let (bytes, l) = encoding.encode(value);
        lossy |= l;
        out.extend_from_slice(&bytes);
        if terminate_last || i + 1 < values.len() {
            out.extend_from_slice(encoding.terminator());
        }
    }
    lossy
}

fn decode_fixed(buf: &[u8], width: usize) -> Result<(FieldValue, usize), FieldError> {
    if buf.len() < width {
        return Err(FieldError::Truncated {
            need: width,
            have: buf.len(),
        });
    }
    let text = TextEncoding::Latin1.decode(&buf[..width]);
    Ok((FieldValue::Text(text.trim_end_matches('\0').to_string()), width))
}

fn encode_fixed(out: &mut Vec<u8>, text: &str, width: usize) -> bool {
    let (mut bytes, lossy) = encode_latin1(text);
    bytes.resize(width, 0);
    out.extend_from_slice(&bytes);
    lossy
}
