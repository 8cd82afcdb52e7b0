//! Frame identifiers

use crate::error::{Id3Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A 3- or 4-character frame identifier made of `A-Z` and `0-9`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId {
    bytes: [u8; 4],
    len: u8,
}

impl FrameId {
    /// Parse an identifier from text
    pub fn new(id: &str) -> Result<Self> {
        Self::from_bytes(id.as_bytes())
            .ok_or_else(|| Id3Error::InvalidFrameIdentifier(id.as_bytes().to_vec()))
    }

    /// Validate raw identifier bytes
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        if !(raw.len() == 3 || raw.len() == 4) {
            return None;
        }
        if !raw.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
            return None;
        }
        let mut bytes = [0u8; 4];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(Self {
            bytes,
            len: raw.len() as u8,
        })
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameId({})", self.as_str())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for FrameId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for FrameId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
