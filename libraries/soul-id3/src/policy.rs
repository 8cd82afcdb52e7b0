/// Read/write policy
use crate::body::EncodingRules;
use crate::encoding::{select_encoding, TextEncoding};
use crate::version::TagVersion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Policy {
    /// Encoding given to new text frames in v2.2/v2.3 tags
    #[serde(default = "default_encoding_v23")]
    pub default_encoding_v23: TextEncoding,

    /// Encoding given to new text frames in v2.4 tags
    #[serde(default = "default_encoding_v24")]
    pub default_encoding_v24: TextEncoding,

    /// Escalation target in v2.4 when ISO-8859-1 cannot carry the text
    #[serde(default = "default_unicode_v24")]
    pub unicode_encoding_v24: TextEncoding,

    /// Rewrite every frame with the default encoding instead of its own
    #[serde(default)]
    pub reset_text_encoding: bool,

    /// Padding added when the tag no longer fits its old space
    #[serde(default = "default_padding")]
    pub padding: usize,

    /// Apply unsynchronisation when writing
    #[serde(default)]
    pub unsynchronise: bool,

    /// Keep frames whose body fails to decode as opaque bytes instead of
    /// dropping them
    #[serde(default)]
    pub keep_invalid_frames: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            default_encoding_v23: default_encoding_v23(),
            default_encoding_v24: default_encoding_v24(),
            unicode_encoding_v24: default_unicode_v24(),
            reset_text_encoding: false,
            padding: default_padding(),
            unsynchronise: false,
            keep_invalid_frames: false,
        }
    }
}

impl Policy {
    /// Encoding for new frames, already restricted to what `version` allows
    pub fn default_encoding(&self, version: TagVersion) -> TextEncoding {
        let requested = match version {
            TagVersion::V2_4 => self.default_encoding_v24,
            _ => self.default_encoding_v23,
        };
        select_encoding(version, requested)
    }

    /// Unicode encoding used when content is not ISO-8859-1
    pub fn unicode_encoding(&self, version: TagVersion) -> TextEncoding {
        match version {
            TagVersion::V2_4 => self.unicode_encoding_v24,
            _ => TextEncoding::Utf16,
        }
    }

    /// Rules a body applies when it is serialised for `version`
    pub fn encoding_rules(&self, version: TagVersion) -> EncodingRules {
        EncodingRules {
            reset_to: self
                .reset_text_encoding
                .then(|| self.default_encoding(version)),
            unicode: self.unicode_encoding(version),
        }
    }
}

// Default values
fn default_encoding_v23() -> TextEncoding {
    TextEncoding::Latin1
}

fn default_encoding_v24() -> TextEncoding {
    TextEncoding::Latin1
}

fn default_unicode_v24() -> TextEncoding {
    TextEncoding::Utf16
}

fn default_padding() -> usize {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let policy = Policy::default();
        assert_eq!(policy.padding, 1024);
        assert_eq!(policy.encoding_rules(TagVersion::V2_3).reset_to, None);
        assert_eq!(
            policy.unicode_encoding(TagVersion::V2_4),
            TextEncoding::Utf16
        );
    }

    #[test]
    fn v24_unicode_choice_does_not_leak_into_v23() {
        let policy = Policy {
            unicode_encoding_v24: TextEncoding::Utf8,
            default_encoding_v23: TextEncoding::Utf8,
            reset_text_encoding: true,
            ..Policy::default()
        };
        let rules = policy.encoding_rules(TagVersion::V2_3);
        assert_eq!(rules.unicode, TextEncoding::Utf16);
        assert_eq!(rules.reset_to, Some(TextEncoding::Latin1));
        assert_eq!(
            policy.encoding_rules(TagVersion::V2_4).unicode,
            TextEncoding::Utf8
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let policy: Policy = serde_json::from_str(r#"{"padding": 0}"#).unwrap();
        assert_eq!(policy.padding, 0);
        assert_eq!(policy.default_encoding_v24, TextEncoding::Latin1);
        assert!(!policy.unsynchronise);
    }
}
