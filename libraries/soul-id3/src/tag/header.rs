//! Tag header, extended header and footer

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::error::{Id3Error, Result};
use crate::syncsafe;
use crate::version::TagVersion;

/// Length of the tag header and of the v2.4 footer
pub const HEADER_LEN: usize = 10;

const MAGIC: &[u8; 3] = b"ID3";
const FOOTER_MAGIC: &[u8; 3] = b"3DI";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagFlags {
    pub unsynchronisation: bool,
    pub extended_header: bool,
    pub experimental: bool,
    /// v2.4 only
    pub footer: bool,
    /// v2.2 only; such tags cannot be decoded
    pub compression: bool,
}

impl TagFlags {
    pub fn from_byte(version: TagVersion, byte: u8) -> Self {
        let unsynchronisation = byte & 0x80 != 0;
        match version {
            TagVersion::V2_2 => Self {
                unsynchronisation,
                compression: byte & 0x40 != 0,
                ..Self::default()
            },
            _ => Self {
                unsynchronisation,
                extended_header: byte & 0x40 != 0,
                experimental: byte & 0x20 != 0,
                footer: version == TagVersion::V2_4 && byte & 0x10 != 0,
                compression: false,
            },
        }
    }

    pub fn to_byte(self, version: TagVersion) -> u8 {
        let bit = |set: bool, mask: u8| if set { mask } else { 0 };
        match version {
            TagVersion::V2_2 => bit(self.unsynchronisation, 0x80),
            _ => {
                bit(self.unsynchronisation, 0x80)
                    | bit(self.extended_header, 0x40)
                    | bit(self.experimental, 0x20)
                    | bit(self.footer && version == TagVersion::V2_4, 0x10)
            }
        }
    }
}

/// The 10-byte `ID3` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub version: TagVersion,
    pub revision: u8,
    pub flags: TagFlags,
    /// Size of everything after the header, excluding a footer
    pub size: u32,
}

impl TagHeader {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < MAGIC.len() || &buf[..3] != MAGIC {
            return Err(Id3Error::TagNotFound);
        }
        if buf.len() < HEADER_LEN {
            return Err(Id3Error::Truncated {
                need: HEADER_LEN,
                have: buf.len(),
            });
        }
        let version = TagVersion::from_major(buf[3]).ok_or(Id3Error::UnsupportedVersion(buf[3]))?;
        let size_bytes = [buf[6], buf[7], buf[8], buf[9]];
        if syncsafe::looks_not_sync_safe(&size_bytes) {
            tracing::warn!("Tag size {:02X?} is not sync-safe", size_bytes);
        }
        Ok(Self {
            version,
            revision: buf[4],
            flags: TagFlags::from_byte(version, buf[5]),
            size: syncsafe::decode(size_bytes),
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        self.encode(MAGIC)
    }

    /// v2.4 footer: the header with its magic reversed
    pub fn footer_bytes(&self) -> [u8; HEADER_LEN] {
        self.encode(FOOTER_MAGIC)
    }

    fn encode(&self, magic: &[u8; 3]) -> [u8; HEADER_LEN] {
        let size = syncsafe::encode(self.size);
        [
            magic[0],
            magic[1],
            magic[2],
            self.version.major(),
            self.revision,
            self.flags.to_byte(self.version),
            size[0],
            size[1],
            size[2],
            size[3],
        ]
    }

    /// Bytes from the start of the header to the first audio byte
    pub fn total_len(&self) -> usize {
        let footer = if self.flags.footer { HEADER_LEN } else { 0 };
        HEADER_LEN + self.size as usize + footer
    }
}

/// v2.4 tag restrictions, decoded for inspection only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagRestrictions {
    /// 0: 128 frames/1 MB, 1: 64/128 KB, 2: 32/40 KB, 3: 32/4 KB
    pub tag_size: u8,
    /// Only ISO-8859-1 or UTF-8
    pub text_encoding: bool,
    /// 0: none, 1: 1024, 2: 128, 3: 30 characters
    pub text_fields_size: u8,
    /// Only PNG or JPEG images
    pub image_encoding: bool,
    /// 0: none, 1: 256x256, 2: 64x64, 3: exactly 64x64
    pub image_size: u8,
}

impl TagRestrictions {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            tag_size: byte >> 6,
            text_encoding: byte & 0x20 != 0,
            text_fields_size: (byte >> 3) & 0x03,
            image_encoding: byte & 0x04 != 0,
            image_size: byte & 0x03,
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.tag_size & 0x03) << 6
            | u8::from(self.text_encoding) << 5
            | (self.text_fields_size & 0x03) << 3
            | u8::from(self.image_encoding) << 2
            | (self.image_size & 0x03)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtendedHeader {
    /// v2.4: this tag updates an earlier one
    pub update: bool,
    /// CRC-32 of the frames as read; recomputed on write when present
    pub crc: Option<u32>,
    /// v2.4 only
    pub restrictions: Option<TagRestrictions>,
    /// v2.3: padding size announced by the writer
    pub padding_size: u32,
}

impl ExtendedHeader {
    /// Parse the extended header at the start of `buf`
    ///
    /// Returns the header and the number of bytes it occupies.
    pub fn parse(version: TagVersion, buf: &[u8]) -> Result<(Self, usize)> {
        match version {
            TagVersion::V2_3 => Self::parse_v23(buf),
            TagVersion::V2_4 => Self::parse_v24(buf),
            _ => Err(Id3Error::InvalidExtendedHeader(format!(
                "{version} has no extended header"
            ))),
        }
    }

    fn parse_v23(buf: &[u8]) -> Result<(Self, usize)> {
        need(buf, 10)?;
        let size = BigEndian::read_u32(&buf[..4]) as usize;
        if size != 6 && size != 10 {
            return Err(Id3Error::InvalidExtendedHeader(format!(
                "v2.3 extended header size {size}"
            )));
        }
        let has_crc = buf[4] & 0x80 != 0;
        let mut header = Self {
            padding_size: BigEndian::read_u32(&buf[6..10]),
            ..Self::default()
        };
        if has_crc {
            need(buf, 14)?;
            header.crc = Some(BigEndian::read_u32(&buf[10..14]));
        }
        Ok((header, 4 + size))
    }

    fn parse_v24(buf: &[u8]) -> Result<(Self, usize)> {
        need(buf, 6)?;
        let size = syncsafe::decode([buf[0], buf[1], buf[2], buf[3]]) as usize;
        if size < 6 {
            return Err(Id3Error::InvalidExtendedHeader(format!(
                "v2.4 extended header size {size}"
            )));
        }
        need(buf, size)?;
        if buf[4] != 1 {
            return Err(Id3Error::InvalidExtendedHeader(format!(
                "{} flag bytes",
                buf[4]
            )));
        }
        let flags = buf[5];
        let mut header = Self {
            update: flags & 0x40 != 0,
            ..Self::default()
        };
        let mut pos = 6;
        if header.update {
            flag_data(buf, size, &mut pos, 0)?;
        }
        if flags & 0x20 != 0 {
            let raw = flag_data(buf, size, &mut pos, 5)?;
            header.crc = Some(syncsafe::decode_crc([raw[0], raw[1], raw[2], raw[3], raw[4]]));
        }
        if flags & 0x10 != 0 {
            let raw = flag_data(buf, size, &mut pos, 1)?;
            header.restrictions = Some(TagRestrictions::from_byte(raw[0]));
        }
        Ok((header, size))
    }

    /// Keep only what `version` can express
    pub fn for_version(&self, version: TagVersion) -> Option<Self> {
        match version {
            TagVersion::V2_3 => Some(Self {
                update: false,
                restrictions: None,
                ..self.clone()
            }),
            TagVersion::V2_4 => Some(Self {
                padding_size: 0,
                ..self.clone()
            }),
            _ => None,
        }
    }

    /// Serialised length for `version`
    pub fn encoded_len(&self, version: TagVersion) -> usize {
        match version {
            TagVersion::V2_3 => {
                if self.crc.is_some() {
                    14
                } else {
                    10
                }
            }
            _ => {
                6 + usize::from(self.update)
                    + if self.crc.is_some() { 6 } else { 0 }
                    + if self.restrictions.is_some() { 2 } else { 0 }
            }
        }
    }

    /// Serialise with the given CRC and padding size
    pub fn to_bytes(&self, version: TagVersion, crc: Option<u32>, padding: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len(version));
        match version {
            TagVersion::V2_3 => {
                let size: u32 = if crc.is_some() { 10 } else { 6 };
                out.extend_from_slice(&size.to_be_bytes());
                out.push(if crc.is_some() { 0x80 } else { 0 });
                out.push(0);
                out.extend_from_slice(&padding.to_be_bytes());
                if let Some(crc) = crc {
                    out.extend_from_slice(&crc.to_be_bytes());
                }
            }
            _ => {
                out.extend_from_slice(&syncsafe::encode(self.encoded_len(version) as u32));
                out.push(1);
                let flags = if self.update { 0x40 } else { 0 }
                    | if crc.is_some() { 0x20 } else { 0 }
                    | if self.restrictions.is_some() { 0x10 } else { 0 };
                out.push(flags);
                if self.update {
                    out.push(0);
                }
                if let Some(crc) = crc {
                    out.push(5);
                    out.extend_from_slice(&syncsafe::encode_crc(crc));
                }
                if let Some(restrictions) = self.restrictions {
                    out.push(1);
                    out.push(restrictions.to_byte());
                }
            }
        }
        out
    }
}

/// Length-prefixed data of one v2.4 extended header flag
fn flag_data<'a>(buf: &'a [u8], size: usize, pos: &mut usize, expected: usize) -> Result<&'a [u8]> {
    let at = *pos;
    let len = *buf.get(at).ok_or(Id3Error::Truncated {
        need: at + 1,
        have: size,
    })? as usize;
    if len != expected || at + 1 + len > size {
        return Err(Id3Error::InvalidExtendedHeader(format!(
            "flag data of {len} bytes at offset {at}"
        )));
    }
    *pos = at + 1 + len;
    Ok(&buf[at + 1..at + 1 + len])
}

fn need(buf: &[u8], n: usize) -> Result<()> {
    if buf.len() < n {
        return Err(Id3Error::Truncated {
            need: n,
            have: buf.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let raw = [b'I', b'D', b'3', 4, 0, 0x50, 0, 0, 0x02, 0x01];
        let header = TagHeader::parse(&raw).unwrap();
        assert_eq!(header.version, TagVersion::V2_4);
        assert_eq!(header.size, 257);
        assert!(header.flags.extended_header && header.flags.footer);
        assert_eq!(header.to_bytes(), raw);
        assert_eq!(&header.footer_bytes()[..3], b"3DI");
        assert_eq!(header.total_len(), 277);
    }

    #[test]
    fn header_errors() {
        assert!(matches!(
            TagHeader::parse(b"TAG"),
            Err(Id3Error::TagNotFound)
        ));
        assert!(matches!(
            TagHeader::parse(b"ID3\x05\x00\x00\x00\x00\x00\x00"),
            Err(Id3Error::UnsupportedVersion(5))
        ));
        assert!(matches!(
            TagHeader::parse(b"ID3\x03\x00"),
            Err(Id3Error::Truncated { need: 10, have: 5 })
        ));
    }

    #[test]
    fn v22_compression_flag() {
        let flags = TagFlags::from_byte(TagVersion::V2_2, 0x40);
        assert!(flags.compression && !flags.extended_header);
    }

    #[test]
    fn v23_extended_header_with_crc() {
        let ext = ExtendedHeader {
            crc: Some(0x1234_5678),
            padding_size: 100,
            ..ExtendedHeader::default()
        };
        let bytes = ext.to_bytes(TagVersion::V2_3, ext.crc, 100);
        assert_eq!(bytes.len(), ext.encoded_len(TagVersion::V2_3));
        let (parsed, consumed) = ExtendedHeader::parse(TagVersion::V2_3, &bytes).unwrap();
        assert_eq!(consumed, 14);
        assert_eq!(parsed, ext);
    }

    #[test]
    fn v24_extended_header_with_everything() {
        let ext = ExtendedHeader {
            update: true,
            crc: Some(0xCAFE_F00D),
            restrictions: Some(TagRestrictions::from_byte(0b1010_0101)),
            padding_size: 0,
        };
        let bytes = ext.to_bytes(TagVersion::V2_4, ext.crc, 0);
        assert_eq!(bytes.len(), 15);
        let (parsed, consumed) = ExtendedHeader::parse(TagVersion::V2_4, &bytes).unwrap();
        assert_eq!(consumed, 15);
        assert_eq!(parsed, ext);
        assert_eq!(parsed.restrictions.unwrap().to_byte(), 0b1010_0101);
    }

    #[test]
    fn rejects_bad_extended_headers() {
        assert!(ExtendedHeader::parse(TagVersion::V2_3, &[0, 0, 0, 7, 0, 0, 0, 0, 0, 0]).is_err());
        assert!(ExtendedHeader::parse(TagVersion::V2_4, &[0, 0, 0, 2, 1, 0]).is_err());
        assert!(ExtendedHeader::parse(TagVersion::V2_4, &[0, 0, 0, 6]).is_err());
    }
}
