//! Text encodings and version-aware encoding negotiation

use crate::version::TagVersion;
use serde::{Deserialize, Serialize};

/// Text encoding byte of ID3v2 text-bearing frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// ISO-8859-1, `$00`
    #[default]
    Latin1,
    /// UTF-16 with byte order mark, `$01`
    Utf16,
    /// UTF-16 big-endian without BOM, `$02` (v2.4 only)
    Utf16Be,
    /// UTF-8, `$03` (v2.4 only)
    Utf8,
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Latin1),
            1 => Some(Self::Utf16),
            2 => Some(Self::Utf16Be),
            3 => Some(Self::Utf8),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Latin1 => 0,
            Self::Utf16 => 1,
            Self::Utf16Be => 2,
            Self::Utf8 => 3,
        }
    }

    /// Whether strings use 2-byte code units
    pub fn is_wide(self) -> bool {
        matches!(self, Self::Utf16 | Self::Utf16Be)
    }

    /// String terminator for this encoding
    pub fn terminator(self) -> &'static [u8] {
        if self.is_wide() {
            &[0, 0]
        } else {
            &[0]
        }
    }

    /// Whether every character of `text` is representable
    pub fn can_encode(self, text: &str) -> bool {
        match self {
            Self::Latin1 => is_latin1(text),
            _ => true,
        }
    }

    /// Decode a single string (no terminator) in this encoding
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16 => match bytes {
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, true),
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, false),
                // Missing BOM: most writers that omit it are little-endian
                _ => decode_utf16(bytes, false),
            },
            Self::Utf16Be => decode_utf16(bytes, true),
        }
    }

    /// Encode a single string without terminator
    ///
    /// Returns the bytes and whether characters had to be replaced.
    pub fn encode(self, text: &str) -> (Vec<u8>, bool) {
        match self {
            Self::Latin1 => encode_latin1(text),
            Self::Utf8 => (text.as_bytes().to_vec(), false),
            Self::Utf16 => {
                let mut out = Vec::with_capacity(2 + text.len() * 2);
                out.extend_from_slice(&[0xFF, 0xFE]);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                (out, false)
            }
            Self::Utf16Be => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                (out, false)
            }
        }
    }

    /// Encoded length of a single string without terminator
    pub fn encoded_len(self, text: &str) -> usize {
        match self {
            Self::Latin1 => text.chars().count(),
            Self::Utf8 => text.len(),
            Self::Utf16 => 2 + text.encode_utf16().count() * 2,
            Self::Utf16Be => text.encode_utf16().count() * 2,
        }
    }
}

fn decode_utf16(bytes: &[u8], big_endian: bool) -> String {
    let units = bytes.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Whether every character fits ISO-8859-1
pub fn is_latin1(text: &str) -> bool {
    text.chars().all(|c| (c as u32) <= 0xFF)
}

/// Encode as ISO-8859-1, substituting `?` for anything outside it
pub fn encode_latin1(text: &str) -> (Vec<u8>, bool) {
    let mut lossy = false;
    let bytes = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                lossy = true;
                b'?'
            }
        })
        .collect();
    (bytes, lossy)
}

/// Restrict a requested encoding to the ones the version allows
///
/// v2.2 and v2.3 only know ISO-8859-1 and UTF-16 with BOM.
pub fn select_encoding(version: TagVersion, requested: TextEncoding) -> TextEncoding {
    match version {
        TagVersion::V2_4 => requested,
        _ => match requested {
            TextEncoding::Utf8 => TextEncoding::Latin1,
            TextEncoding::Utf16Be => TextEncoding::Utf16,
            other => other,
        },
    }
}

/// Pick the encoding to write: legal for `version`, escalated to `unicode`
/// when some text is not representable in the selected encoding
pub fn negotiate<'a>(
    version: TagVersion,
    requested: TextEncoding,
    unicode: TextEncoding,
    texts: impl IntoIterator<Item = &'a str>,
) -> TextEncoding {
    let selected = select_encoding(version, requested);
    if texts.into_iter().all(|t| selected.can_encode(t)) {
        selected
    } else {
        select_encoding(version, unicode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_per_version() {
        assert_eq!(
            select_encoding(TagVersion::V2_3, TextEncoding::Utf8),
            TextEncoding::Latin1
        );
        assert_eq!(
            select_encoding(TagVersion::V2_2, TextEncoding::Utf16Be),
            TextEncoding::Utf16
        );
        assert_eq!(
            select_encoding(TagVersion::V2_4, TextEncoding::Utf8),
            TextEncoding::Utf8
        );
    }

    #[test]
    fn negotiation_escalates_for_non_latin_text() {
        let enc = negotiate(
            TagVersion::V2_3,
            TextEncoding::Utf8,
            TextEncoding::Utf16,
            ["Björk", "東京"],
        );
        assert_eq!(enc, TextEncoding::Utf16);

        let enc = negotiate(
            TagVersion::V2_3,
            TextEncoding::Latin1,
            TextEncoding::Utf16,
            ["Björk"],
        );
        assert_eq!(enc, TextEncoding::Latin1);
    }

    #[test]
    fn utf16_bom_handling() {
        let (bytes, lossy) = TextEncoding::Utf16.encode("Aé");
        assert!(!lossy);
        assert_eq!(bytes, vec![0xFF, 0xFE, 0x41, 0x00, 0xE9, 0x00]);
        assert_eq!(TextEncoding::Utf16.decode(&bytes), "Aé");
        assert_eq!(TextEncoding::Utf16.decode(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(TextEncoding::Utf16.decode(&[0x41, 0x00]), "A");
        assert_eq!(TextEncoding::Utf16.encoded_len("Aé"), 6);
    }

    #[test]
    fn latin1_substitution_is_flagged() {
        let (bytes, lossy) = TextEncoding::Latin1.encode("a東b");
        assert!(lossy);
        assert_eq!(bytes, b"a?b".to_vec());
    }
}
