//! Tag versions and the per-version frame layout

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported tag versions
///
/// Serialised through its display form (`"ID3v2.4"`); deserialising also
/// accepts the short forms `FromStr` does (`"2.4"`, `"v2.3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TagVersion {
    /// ID3v1 (128-byte trailer)
    V1,
    /// ID3v1.1 (trailer with track number)
    V1_1,
    /// ID3v2.2 (3-character identifiers)
    V2_2,
    /// ID3v2.3
    V2_3,
    /// ID3v2.4
    V2_4,
}

impl TagVersion {
    /// Map a v2 header major version byte
    pub fn from_major(major: u8) -> Option<Self> {
        match major {
            2 => Some(Self::V2_2),
            3 => Some(Self::V2_3),
            4 => Some(Self::V2_4),
            _ => None,
        }
    }

    /// Major version byte written in the v2 header
    pub fn major(self) -> u8 {
        match self {
            Self::V1 | Self::V1_1 => 1,
            Self::V2_2 => 2,
            Self::V2_3 => 3,
            Self::V2_4 => 4,
        }
    }

    pub fn is_v2(self) -> bool {
        matches!(self, Self::V2_2 | Self::V2_3 | Self::V2_4)
    }

    /// Frame layout for v2 versions
    pub fn layout(self) -> Option<FrameLayout> {
        match self {
            Self::V1 | Self::V1_1 => None,
            Self::V2_2 => Some(FrameLayout::V2_2),
            Self::V2_3 => Some(FrameLayout::V2_3),
            Self::V2_4 => Some(FrameLayout::V2_4),
        }
    }

    /// Identifier width; 0 for v1 which has no frames
    pub fn id_width(self) -> usize {
        self.layout().map_or(0, |l| l.id_len)
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::V1 => "ID3v1",
            Self::V1_1 => "ID3v1.1",
            Self::V2_2 => "ID3v2.2",
            Self::V2_3 => "ID3v2.3",
            Self::V2_4 => "ID3v2.4",
        };
        f.write_str(s)
    }
}

impl FromStr for TagVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let trimmed = trimmed.trim_start_matches("id3").trim_start_matches('v');
        match trimmed {
            "1" | "1.0" => Ok(Self::V1),
            "1.1" => Ok(Self::V1_1),
            "2.2" | "22" => Ok(Self::V2_2),
            "2.3" | "23" => Ok(Self::V2_3),
            "2.4" | "24" => Ok(Self::V2_4),
            _ => Err(format!("unknown tag version: {s}")),
        }
    }
}

impl TryFrom<String> for TagVersion {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TagVersion> for String {
    fn from(version: TagVersion) -> Self {
        version.to_string()
    }
}

/// Widths and encodings of a frame header for one v2 version
///
/// One frame loop serves all three versions by consulting this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Identifier length in bytes
    pub id_len: usize,
    /// Size field length in bytes
    pub size_len: usize,
    /// Whether the size field is sync-safe
    pub sync_safe_size: bool,
    /// Whether two flag bytes follow the size
    pub has_flags: bool,
}

impl FrameLayout {
    pub const V2_2: Self = Self {
        id_len: 3,
        size_len: 3,
        sync_safe_size: false,
        has_flags: false,
    };

    pub const V2_3: Self = Self {
        id_len: 4,
        size_len: 4,
        sync_safe_size: false,
        has_flags: true,
    };

    pub const V2_4: Self = Self {
        id_len: 4,
        size_len: 4,
        sync_safe_size: true,
        has_flags: true,
    };

    /// Total frame header length
    pub fn header_len(&self) -> usize {
        self.id_len + self.size_len + if self.has_flags { 2 } else { 0 }
    }

    /// Largest body size the size field can carry
    pub fn max_frame_size(&self) -> u32 {
        if self.sync_safe_size {
            crate::syncsafe::MAX_SYNC_SAFE
        } else if self.size_len == 3 {
            0x00FF_FFFF
        } else {
            u32::MAX
        }
    }
}
