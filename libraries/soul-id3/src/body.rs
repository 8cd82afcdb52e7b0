//! Frame body model
//!
//! A body is either a known layout (an ordered list of typed fields) or an
//! opaque byte range for identifiers the catalog does not know. Sizes are
//! never cached: they are computed from the current values every time.

use crate::encoding::{negotiate, TextEncoding};
use crate::error::FieldError;
use crate::field::{FieldContext, FieldDescriptor, FieldKind, FieldName, FieldValue};
use crate::frame_id::FrameId;
use crate::version::TagVersion;

use FieldKind::{
    BinaryToEnd, Encoding, EncodedTerminated, EncodedToEnd, FixedLatin1, FrameIdRef,
    Latin1Terminated, Latin1ToEnd, PairedText, SyncedEntries, UInt, VarUInt,
};
use FieldName as N;

const fn f(name: FieldName, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor::new(name, kind)
}

/// Layout families shared by frame identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Text,
    UserText,
    Url,
    UserUrl,
    Comment,
    PairedText,
    Picture,
    PictureV22,
    Object,
    PlayCounter,
    Popularimeter,
    UniqueFileId,
    Private,
    MusicCdId,
    EventTiming,
    TempoCodes,
    LocationLookup,
    SyncLyrics,
    RelativeVolume2,
    Binary,
    Equalisation2,
    Reverb,
    RecommendedBuffer,
    AudioEncryption,
    LinkedInfo,
    Position,
    TermsOfUse,
    Ownership,
    Commercial,
    EncryptionMethod,
    GroupId,
    Signature,
    Seek,
    SeekIndex,
    EncryptedMeta,
}

const TEXT: &[FieldDescriptor] = &[f(N::TextEncoding, Encoding), f(N::Text, EncodedToEnd)];
const USER_TEXT: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::Description, EncodedTerminated),
    f(N::Text, EncodedToEnd),
];
const URL: &[FieldDescriptor] = &[f(N::Url, Latin1ToEnd)];
const USER_URL: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::Description, EncodedTerminated),
    f(N::Url, Latin1ToEnd),
];
const COMMENT: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::Language, FixedLatin1(3)),
    f(N::Description, EncodedTerminated),
    f(N::Text, EncodedToEnd),
];
const PAIRED_TEXT: &[FieldDescriptor] =
    &[f(N::TextEncoding, Encoding), f(N::People, PairedText)];
const PICTURE: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::MimeType, Latin1Terminated),
    f(N::PictureType, UInt(1)),
    f(N::Description, EncodedTerminated),
    f(N::PictureData, BinaryToEnd),
];
const PICTURE_V22: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::ImageFormat, FixedLatin1(3)),
    f(N::PictureType, UInt(1)),
    f(N::Description, EncodedTerminated),
    f(N::PictureData, BinaryToEnd),
];
const OBJECT: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::MimeType, Latin1Terminated),
    f(N::Filename, EncodedTerminated),
    f(N::Description, EncodedTerminated),
    f(N::ObjectData, BinaryToEnd),
];
const PLAY_COUNTER: &[FieldDescriptor] = &[f(N::Counter, VarUInt { min: 4 })];
const POPULARIMETER: &[FieldDescriptor] = &[
    f(N::Email, Latin1Terminated),
    f(N::Rating, UInt(1)),
    f(N::Counter, VarUInt { min: 0 }),
];
const UNIQUE_FILE_ID: &[FieldDescriptor] =
    &[f(N::Owner, Latin1Terminated), f(N::Identifier, BinaryToEnd)];
const PRIVATE: &[FieldDescriptor] = &[f(N::Owner, Latin1Terminated), f(N::Data, BinaryToEnd)];
const BINARY: &[FieldDescriptor] = &[f(N::Data, BinaryToEnd)];
const EVENT_TIMING: &[FieldDescriptor] =
    &[f(N::TimestampFormat, UInt(1)), f(N::EventData, BinaryToEnd)];
const TEMPO_CODES: &[FieldDescriptor] =
    &[f(N::TimestampFormat, UInt(1)), f(N::TempoData, BinaryToEnd)];
const LOCATION_LOOKUP: &[FieldDescriptor] = &[
    f(N::FramesBetweenReferences, UInt(2)),
    f(N::BytesBetweenReferences, UInt(3)),
    f(N::MillisecondsBetweenReferences, UInt(3)),
    f(N::BitsForBytesDeviation, UInt(1)),
    f(N::BitsForMillisecondsDeviation, UInt(1)),
    f(N::DeviationData, BinaryToEnd),
];
const SYNC_LYRICS: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::Language, FixedLatin1(3)),
    f(N::TimestampFormat, UInt(1)),
    f(N::ContentType, UInt(1)),
    f(N::Description, EncodedTerminated),
    f(N::SyncedText, SyncedEntries),
];
const RELATIVE_VOLUME_2: &[FieldDescriptor] =
    &[f(N::Identifier, Latin1Terminated), f(N::Adjustment, BinaryToEnd)];
const EQUALISATION_2: &[FieldDescriptor] = &[
    f(N::Interpolation, UInt(1)),
    f(N::Identifier, Latin1Terminated),
    f(N::Adjustment, BinaryToEnd),
];
const REVERB: &[FieldDescriptor] = &[
    f(N::ReverbLeft, UInt(2)),
    f(N::ReverbRight, UInt(2)),
    f(N::BouncesLeft, UInt(1)),
    f(N::BouncesRight, UInt(1)),
    f(N::FeedbackLeftToLeft, UInt(1)),
    f(N::FeedbackLeftToRight, UInt(1)),
    f(N::FeedbackRightToRight, UInt(1)),
    f(N::FeedbackRightToLeft, UInt(1)),
    f(N::PremixLeftToRight, UInt(1)),
    f(N::PremixRightToLeft, UInt(1)),
];
const RECOMMENDED_BUFFER: &[FieldDescriptor] = &[
    f(N::BufferSize, UInt(3)),
    f(N::EmbeddedInfo, UInt(1)),
    f(N::OffsetToNextTag, VarUInt { min: 4 }),
];
const AUDIO_ENCRYPTION: &[FieldDescriptor] = &[
    f(N::Owner, Latin1Terminated),
    f(N::PreviewStart, UInt(2)),
    f(N::PreviewLength, UInt(2)),
    f(N::EncryptionInfo, BinaryToEnd),
];
const LINKED_INFO: &[FieldDescriptor] = &[
    f(N::LinkedFrame, FrameIdRef),
    f(N::Url, Latin1Terminated),
    f(N::AdditionalData, Latin1ToEnd),
];
const POSITION: &[FieldDescriptor] = &[
    f(N::TimestampFormat, UInt(1)),
    f(N::Position, VarUInt { min: 1 }),
];
const TERMS_OF_USE: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::Language, FixedLatin1(3)),
    f(N::Text, EncodedToEnd),
];
const OWNERSHIP: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::PricePaid, Latin1Terminated),
    f(N::PurchaseDate, FixedLatin1(8)),
    f(N::Seller, EncodedToEnd),
];
const COMMERCIAL: &[FieldDescriptor] = &[
    f(N::TextEncoding, Encoding),
    f(N::Price, Latin1Terminated),
    f(N::ValidUntil, FixedLatin1(8)),
    f(N::ContactUrl, Latin1Terminated),
    f(N::ReceivedAs, UInt(1)),
    f(N::SellerName, EncodedTerminated),
    f(N::Description, EncodedTerminated),
    f(N::MimeType, Latin1Terminated),
    f(N::SellerLogo, BinaryToEnd),
];
const ENCRYPTION_METHOD: &[FieldDescriptor] = &[
    f(N::Owner, Latin1Terminated),
    f(N::MethodSymbol, UInt(1)),
    f(N::Data, BinaryToEnd),
];
const GROUP_ID: &[FieldDescriptor] = &[
    f(N::Owner, Latin1Terminated),
    f(N::GroupSymbol, UInt(1)),
    f(N::Data, BinaryToEnd),
];
const SIGNATURE: &[FieldDescriptor] =
    &[f(N::GroupSymbol, UInt(1)), f(N::Signature, BinaryToEnd)];
const SEEK: &[FieldDescriptor] = &[f(N::MinimumOffset, UInt(4))];
const SEEK_INDEX: &[FieldDescriptor] = &[
    f(N::IndexedDataStart, UInt(4)),
    f(N::IndexedDataLength, UInt(4)),
    f(N::IndexPoints, UInt(2)),
    f(N::BitsPerIndexPoint, UInt(1)),
    f(N::IndexData, BinaryToEnd),
];
const ENCRYPTED_META: &[FieldDescriptor] = &[
    f(N::Owner, Latin1Terminated),
    f(N::Description, Latin1Terminated),
    f(N::Data, BinaryToEnd),
];

impl BodyKind {
    /// Wire layout, in order
    pub fn layout(self) -> &'static [FieldDescriptor] {
        match self {
            Self::Text => TEXT,
            Self::UserText => USER_TEXT,
            Self::Url => URL,
            Self::UserUrl => USER_URL,
            Self::Comment => COMMENT,
            Self::PairedText => PAIRED_TEXT,
            Self::Picture => PICTURE,
            Self::PictureV22 => PICTURE_V22,
            Self::Object => OBJECT,
            Self::PlayCounter => PLAY_COUNTER,
            Self::Popularimeter => POPULARIMETER,
            Self::UniqueFileId => UNIQUE_FILE_ID,
            Self::Private => PRIVATE,
            Self::MusicCdId | Self::Binary => BINARY,
            Self::EventTiming => EVENT_TIMING,
            Self::TempoCodes => TEMPO_CODES,
            Self::LocationLookup => LOCATION_LOOKUP,
            Self::SyncLyrics => SYNC_LYRICS,
            Self::RelativeVolume2 => RELATIVE_VOLUME_2,
            Self::Equalisation2 => EQUALISATION_2,
            Self::Reverb => REVERB,
            Self::RecommendedBuffer => RECOMMENDED_BUFFER,
            Self::AudioEncryption => AUDIO_ENCRYPTION,
            Self::LinkedInfo => LINKED_INFO,
            Self::Position => POSITION,
            Self::TermsOfUse => TERMS_OF_USE,
            Self::Ownership => OWNERSHIP,
            Self::Commercial => COMMERCIAL,
            Self::EncryptionMethod => ENCRYPTION_METHOD,
            Self::GroupId => GROUP_ID,
            Self::Signature => SIGNATURE,
            Self::Seek => SEEK,
            Self::SeekIndex => SEEK_INDEX,
            Self::EncryptedMeta => ENCRYPTED_META,
        }
    }

    /// Whether the layout starts with a text encoding byte
    pub fn has_encoding(self) -> bool {
        self.layout()
            .first()
            .is_some_and(|d| d.kind == FieldKind::Encoding)
    }
}

/// How a body resolves its text encoding at write time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingRules {
    /// Replace the stored encoding with this one before negotiating
    pub reset_to: Option<TextEncoding>,
    /// Escalation target when the content is not representable
    pub unicode: TextEncoding,
}

impl Default for EncodingRules {
    fn default() -> Self {
        Self {
            reset_to: None,
            unicode: TextEncoding::Utf16,
        }
    }
}

/// A decoded field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub descriptor: FieldDescriptor,
    pub value: FieldValue,
}

/// Serialised body and the fields that needed placeholder characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBody {
    pub bytes: Vec<u8>,
    pub substituted: Vec<FieldName>,
}

/// Body with a known field layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBody {
    kind: BodyKind,
    fields: Vec<Field>,
}

impl FieldBody {
    /// Body with every field at its default value
    pub fn empty(kind: BodyKind) -> Self {
        let fields = kind
            .layout()
            .iter()
            .map(|d| Field {
                descriptor: *d,
                value: d.kind.default_value(),
            })
            .collect();
        Self { kind, fields }
    }

    /// Decode fields sequentially from `data`
    ///
    /// Fields that start exactly at the end of the data take their default
    /// value when they are strings or size-terminated; fixed-width fields
    /// cannot, and fail the body.
    pub fn decode(kind: BodyKind, data: &[u8], version: TagVersion) -> Result<Self, FieldError> {
        let mut ctx = FieldContext::new(TextEncoding::Latin1, version.id_width());
        let mut offset = 0;
        let mut fields = Vec::with_capacity(kind.layout().len());

        for descriptor in kind.layout() {
            let remaining = &data[offset..];
            let lenient = matches!(
                descriptor.kind,
                FieldKind::Latin1Terminated | FieldKind::EncodedTerminated
            ) || descriptor.kind.is_to_end();
            let (value, consumed) = if remaining.is_empty() && lenient {
                (descriptor.kind.default_value(), 0)
            } else {
                descriptor.decode(remaining, &ctx)?
            };
            if descriptor.kind == FieldKind::Encoding {
                if let Some(encoding) = value
                    .as_int()
                    .and_then(|b| TextEncoding::from_byte(b as u8))
                {
                    ctx.encoding = encoding;
                }
            }
            offset += consumed;
            fields.push(Field {
                descriptor: *descriptor,
                value,
            });
        }

        if offset < data.len() {
            tracing::debug!(
                "{:?} body has {} trailing bytes after its last field",
                kind,
                data.len() - offset
            );
        }

        Ok(Self { kind, fields })
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: FieldName) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.descriptor.name == name)
            .map(|f| &f.value)
    }

    pub fn text(&self, name: FieldName) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn int(&self, name: FieldName) -> Option<u64> {
        self.get(name).and_then(FieldValue::as_int)
    }

    pub fn binary(&self, name: FieldName) -> Option<&[u8]> {
        self.get(name).and_then(FieldValue::as_binary)
    }

    pub fn pairs(&self, name: FieldName) -> Option<&[(String, String)]> {
        self.get(name).and_then(FieldValue::as_pairs)
    }

    /// Set a field, checking that the value fits the field's kind
    pub fn set(&mut self, name: FieldName, value: FieldValue) -> Result<(), FieldError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.descriptor.name == name)
            .ok_or(FieldError::TypeMismatch(name.as_str()))?;
        if !value.matches(field.descriptor.kind) {
            return Err(FieldError::TypeMismatch(name.as_str()));
        }
        if field.descriptor.kind == FieldKind::Encoding {
            let byte = value.as_int().unwrap_or_default();
            if byte > 3 {
                return Err(FieldError::UnknownEncoding(byte as u8));
            }
        }
        field.value = value;
        Ok(())
    }

    pub fn set_text(&mut self, name: FieldName, text: impl Into<String>) -> Result<(), FieldError> {
        self.set(name, FieldValue::Text(text.into()))
    }

    pub fn set_int(&mut self, name: FieldName, value: u64) -> Result<(), FieldError> {
        self.set(name, FieldValue::Int(value))
    }

    /// Stored text encoding, if the layout has one
    pub fn encoding(&self) -> Option<TextEncoding> {
        self.int(FieldName::TextEncoding)
            .and_then(|b| TextEncoding::from_byte(b as u8))
    }

    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        if let Some(field) = self
            .fields
            .iter_mut()
            .find(|f| f.descriptor.kind == FieldKind::Encoding)
        {
            field.value = FieldValue::Int(u64::from(encoding.as_byte()));
        }
    }

    /// Every string that will be written with the body encoding
    fn encoded_strings(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.descriptor.kind.uses_body_encoding())
            .flat_map(|f| match &f.value {
                FieldValue::Text(s) => vec![s.as_str()],
                FieldValue::Pairs(p) => p
                    .iter()
                    .flat_map(|(k, v)| [k.as_str(), v.as_str()])
                    .collect(),
                FieldValue::Synced(entries) => entries.iter().map(|(s, _)| s.as_str()).collect(),
                _ => Vec::new(),
            })
    }

    /// Encoding that will actually be written for `version`
    ///
    /// Evaluated on every call so changes to content or version after the
    /// field was set are honoured.
    pub fn negotiated_encoding(&self, version: TagVersion, rules: &EncodingRules) -> TextEncoding {
        let requested = rules
            .reset_to
            .or_else(|| self.encoding())
            .unwrap_or_default();
        negotiate(version, requested, rules.unicode, self.encoded_strings())
    }

    fn context(&self, version: TagVersion, rules: &EncodingRules) -> FieldContext {
        FieldContext::new(self.negotiated_encoding(version, rules), version.id_width())
    }

    /// Serialised size for `version`
    pub fn size(&self, version: TagVersion, rules: &EncodingRules) -> Result<usize, FieldError> {
        let ctx = self.context(version, rules);
        self.fields
            .iter()
            .map(|f| f.descriptor.size(&f.value, &ctx))
            .sum()
    }

    /// Serialise for `version`
    pub fn encode(&self, version: TagVersion, rules: &EncodingRules) -> Result<EncodedBody, FieldError> {
        let ctx = self.context(version, rules);
        let mut out = EncodedBody::default();
        for field in &self.fields {
            let result = field.descriptor.encode(&field.value, &ctx, &mut out.bytes)?;
            if result.lossy {
                out.substituted.push(field.descriptor.name);
            }
        }
        Ok(out)
    }
}

/// Body of a frame the catalog does not know, kept byte for byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedBody {
    pub id: FrameId,
    pub data: Vec<u8>,
}

/// Frame body: typed fields or opaque bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBody {
    Known(FieldBody),
    Unsupported(UnsupportedBody),
}

impl FrameBody {
    pub fn kind(&self) -> Option<BodyKind> {
        match self {
            Self::Known(body) => Some(body.kind()),
            Self::Unsupported(_) => None,
        }
    }

    pub fn as_known(&self) -> Option<&FieldBody> {
        match self {
            Self::Known(body) => Some(body),
            Self::Unsupported(_) => None,
        }
    }

    pub fn as_known_mut(&mut self) -> Option<&mut FieldBody> {
        match self {
            Self::Known(body) => Some(body),
            Self::Unsupported(_) => None,
        }
    }

    pub fn size(&self, version: TagVersion, rules: &EncodingRules) -> Result<usize, FieldError> {
        match self {
            Self::Known(body) => body.size(version, rules),
            Self::Unsupported(body) => Ok(body.data.len()),
        }
    }

    pub fn encode(&self, version: TagVersion, rules: &EncodingRules) -> Result<EncodedBody, FieldError> {
        match self {
            Self::Known(body) => body.encode(version, rules),
            Self::Unsupported(body) => Ok(EncodedBody {
                bytes: body.data.clone(),
                substituted: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_follows_layout() {
        let body = FieldBody::empty(BodyKind::Comment);
        let names: Vec<FieldName> = body.fields().iter().map(|f| f.descriptor.name).collect();
        assert_eq!(
            names,
            vec![
                FieldName::TextEncoding,
                FieldName::Language,
                FieldName::Description,
                FieldName::Text
            ]
        );
    }

    #[test]
    fn comment_decode_and_encode() {
        let data = b"\x00engshort\x00The long text";
        let body = FieldBody::decode(BodyKind::Comment, data, TagVersion::V2_3).unwrap();
        assert_eq!(body.text(FieldName::Language), Some("eng"));
        assert_eq!(body.text(FieldName::Description), Some("short"));
        assert_eq!(body.text(FieldName::Text), Some("The long text"));

        let rules = EncodingRules::default();
        let encoded = body.encode(TagVersion::V2_3, &rules).unwrap();
        assert_eq!(encoded.bytes, data.to_vec());
        assert_eq!(body.size(TagVersion::V2_3, &rules).unwrap(), data.len());
    }

    #[test]
    fn size_follows_mutation() {
        let mut body = FieldBody::empty(BodyKind::Text);
        let rules = EncodingRules::default();
        assert_eq!(body.size(TagVersion::V2_4, &rules).unwrap(), 1);
        body.set_text(FieldName::Text, "abc").unwrap();
        assert_eq!(body.size(TagVersion::V2_4, &rules).unwrap(), 4);
        body.set_text(FieldName::Text, "東").unwrap();
        // escalates to UTF-16 with BOM: 1 + 2 + 2
        assert_eq!(body.size(TagVersion::V2_4, &rules).unwrap(), 5);
    }

    #[test]
    fn utf8_request_in_v23_is_written_as_utf16() {
        let mut body = FieldBody::empty(BodyKind::Text);
        body.set_encoding(TextEncoding::Utf8);
        body.set_text(FieldName::Text, "Sigur Rós – Ágætis byrjun").unwrap();
        let encoded = body
            .encode(TagVersion::V2_3, &EncodingRules::default())
            .unwrap();
        assert_eq!(encoded.bytes[0], TextEncoding::Utf16.as_byte());
        assert_eq!(&encoded.bytes[1..3], &[0xFF, 0xFE]);

        let v24 = body
            .encode(TagVersion::V2_4, &EncodingRules::default())
            .unwrap();
        assert_eq!(v24.bytes[0], TextEncoding::Utf8.as_byte());
    }

    #[test]
    fn reset_rule_overrides_stored_encoding() {
        let mut body = FieldBody::empty(BodyKind::Text);
        body.set_encoding(TextEncoding::Utf16);
        body.set_text(FieldName::Text, "plain").unwrap();
        let rules = EncodingRules {
            reset_to: Some(TextEncoding::Latin1),
            unicode: TextEncoding::Utf16,
        };
        let encoded = body.encode(TagVersion::V2_3, &rules).unwrap();
        assert_eq!(encoded.bytes, b"\x00plain".to_vec());
    }

    fn synced_lyrics() -> FieldBody {
        let data = b"\x00eng\x02\x01\0Hello\0\x00\x00\x03\xE8";
        FieldBody::decode(BodyKind::SyncLyrics, data, TagVersion::V2_3).unwrap()
    }

    #[test]
    fn synced_lyrics_escalate_with_their_description() {
        let mut body = synced_lyrics();
        assert_eq!(
            body.get(FieldName::SyncedText).and_then(FieldValue::as_synced),
            Some(&[("Hello".to_string(), 1000)][..])
        );
        body.set_text(FieldName::Description, "東京").unwrap();

        let encoded = body
            .encode(TagVersion::V2_3, &EncodingRules::default())
            .unwrap();
        assert_eq!(encoded.bytes[0], TextEncoding::Utf16.as_byte());
        let reread = FieldBody::decode(BodyKind::SyncLyrics, &encoded.bytes, TagVersion::V2_3)
            .unwrap();
        assert_eq!(reread, {
            let mut expected = body.clone();
            expected.set_encoding(TextEncoding::Utf16);
            expected
        });
    }

    #[test]
    fn synced_lyrics_with_unicode_lines_escalate() {
        let mut body = synced_lyrics();
        body.set(
            FieldName::SyncedText,
            FieldValue::Synced(vec![("こんにちは".into(), 500)]),
        )
        .unwrap();
        let encoded = body
            .encode(TagVersion::V2_4, &EncodingRules::default())
            .unwrap();
        assert_eq!(encoded.bytes[0], TextEncoding::Utf16.as_byte());
        assert!(encoded.substituted.is_empty());
        let reread = FieldBody::decode(BodyKind::SyncLyrics, &encoded.bytes, TagVersion::V2_4)
            .unwrap();
        assert_eq!(
            reread.get(FieldName::SyncedText),
            Some(&FieldValue::Synced(vec![("こんにちは".into(), 500)]))
        );
    }

    #[test]
    fn synced_lyrics_follow_a_reset_encoding() {
        let mut body = synced_lyrics();
        body.set_encoding(TextEncoding::Utf8);
        let rules = EncodingRules {
            reset_to: Some(TextEncoding::Utf16),
            unicode: TextEncoding::Utf16,
        };
        let encoded = body.encode(TagVersion::V2_3, &rules).unwrap();
        assert_eq!(body.size(TagVersion::V2_3, &rules).unwrap(), encoded.bytes.len());
        let reread = FieldBody::decode(BodyKind::SyncLyrics, &encoded.bytes, TagVersion::V2_3)
            .unwrap();
        assert_eq!(reread.get(FieldName::SyncedText), body.get(FieldName::SyncedText));
    }

    #[test]
    fn set_rejects_wrong_types() {
        let mut body = FieldBody::empty(BodyKind::Picture);
        assert!(body.set(FieldName::PictureType, FieldValue::Text("x".into())).is_err());
        assert!(body.set(FieldName::Counter, FieldValue::Int(1)).is_err());
        assert!(body.set_int(FieldName::TextEncoding, 9).is_err());
        body.set_int(FieldName::PictureType, 3).unwrap();
        assert_eq!(body.int(FieldName::PictureType), Some(3));
    }

    #[test]
    fn truncated_fixed_field_fails_body() {
        let err = FieldBody::decode(BodyKind::Reverb, &[0, 1, 0], TagVersion::V2_3);
        assert!(err.is_err());
    }

    #[test]
    fn missing_optional_tail_takes_defaults() {
        let body = FieldBody::decode(BodyKind::Popularimeter, b"me@x\0\xC4", TagVersion::V2_3)
            .unwrap();
        assert_eq!(body.text(FieldName::Email), Some("me@x"));
        assert_eq!(body.int(FieldName::Rating), Some(0xC4));
        assert_eq!(body.int(FieldName::Counter), Some(0));
    }
}
