//! Serialising a tag

use serde::Serialize;

use super::header::{ExtendedHeader, TagFlags, TagHeader, HEADER_LEN};
use super::order::frame_order;
use super::Tag;
use crate::error::{Id3Error, Result};
use crate::field::FieldName;
use crate::frame::Frame;
use crate::frame_id::FrameId;
use crate::policy::Policy;
use crate::syncsafe;
use crate::version::TagVersion;

/// A field written with `?` placeholders because its encoding cannot carry
/// the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub frame: FrameId,
    pub field: FieldName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub bytes: Vec<u8>,
    pub substitutions: Vec<Substitution>,
    /// Padding bytes included in `bytes`
    pub padding: usize,
}

/// Writes tags according to a [`Policy`]
#[derive(Debug, Clone, Default)]
pub struct TagWriter {
    policy: Policy,
}

impl TagWriter {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Serialise `tag`
    ///
    /// `current_size` is the space the existing tag occupies before the
    /// audio (header, body and footer). When the new tag fits, it is padded
    /// up to that size so the audio does not move; otherwise the policy's
    /// padding is added.
    pub fn write(&self, tag: &Tag, current_size: Option<u32>) -> Result<WriteReport> {
        let version = tag.version();
        if !version.is_v2() {
            return Err(Id3Error::UnsupportedVersion(version.major()));
        }

        let mut ordered: Vec<&Frame> = tag.frames().iter().collect();
        ordered.sort_by(|a, b| frame_order(a, b));

        let mut frames = Vec::new();
        let mut substitutions = Vec::new();
        for frame in ordered {
            let encoded = frame.encode(version, &self.policy)?;
            for field in encoded.substituted {
                tracing::warn!(
                    "{} field {} cannot carry its text in {}, wrote placeholders",
                    frame.id,
                    field.as_str(),
                    version
                );
                substitutions.push(Substitution {
                    frame: frame.id,
                    field,
                });
            }
            frames.extend_from_slice(&encoded.bytes);
        }

        let extended = tag
            .extended_header
            .as_ref()
            .and_then(|e| e.for_version(version));
        let footer = version == TagVersion::V2_4 && tag.flags.footer;

        let unsynchronise = self.policy.unsynchronise && version != TagVersion::V2_4;
        let ext_len = extended.as_ref().map_or(0, |e| e.encoded_len(version));

        let choose_padding = |content_len: usize| -> usize {
            if footer {
                return 0;
            }
            match current_size {
                Some(available) if HEADER_LEN + content_len <= available as usize => {
                    available as usize - HEADER_LEN - content_len
                }
                _ => self.policy.padding,
            }
        };

        // Unsynchronisation can grow the content, so settle the padding on
        // the assembled length
        let mut padding = choose_padding(ext_len + frames.len());
        let mut body = assemble(version, &frames, extended.as_ref(), unsynchronise, padding);
        let settled = choose_padding(body.len());
        if settled != padding {
            padding = settled;
            body = assemble(version, &frames, extended.as_ref(), unsynchronise, padding);
        }
        body.resize(body.len() + padding, 0);

        if body.len() > syncsafe::MAX_SYNC_SAFE as usize {
            return Err(Id3Error::TooLarge(body.len()));
        }

        let header = TagHeader {
            version,
            revision: 0,
            flags: TagFlags {
                unsynchronisation: unsynchronise,
                extended_header: extended.is_some(),
                experimental: tag.flags.experimental,
                footer,
                compression: false,
            },
            size: body.len() as u32,
        };

        let mut bytes = Vec::with_capacity(header.total_len());
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&body);
        if footer {
            bytes.extend_from_slice(&header.footer_bytes());
        }

        tracing::debug!(
            "Wrote {} tag: {} frames, {} bytes, {} padding",
            version,
            tag.len(),
            bytes.len(),
            padding
        );

        Ok(WriteReport {
            bytes,
            substitutions,
            padding,
        })
    }
}

/// Extended header, frames and tag-level unsynchronisation, without padding
fn assemble(
    version: TagVersion,
    frames: &[u8],
    extended: Option<&ExtendedHeader>,
    unsynchronise: bool,
    padding: usize,
) -> Vec<u8> {
    let mut content = Vec::with_capacity(frames.len() + 16);
    if let Some(ext) = extended {
        let crc = ext.crc.map(|_| match version {
            TagVersion::V2_3 => crc32fast::hash(frames),
            _ => {
                let mut hasher = crc32fast::Hasher::new();
                hasher.update(frames);
                hasher.update(&vec![0u8; padding]);
                hasher.finalize()
            }
        });
        content.extend_from_slice(&ext.to_bytes(version, crc, padding as u32));
    }
    content.extend_from_slice(frames);
    if unsynchronise {
        content = syncsafe::unsynchronise(&content);
    }
    content
}

/// Serialise `tag` with the default policy
pub fn write_tag(tag: &Tag, current_size: Option<u32>) -> Result<Vec<u8>> {
    TagWriter::default()
        .write(tag, current_size)
        .map(|report| report.bytes)
}
