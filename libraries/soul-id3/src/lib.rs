//! Soul ID3
//!
//! ID3 tag engine for Soul Player.
//!
//! This crate provides:
//! - ID3v2.2, v2.3 and v2.4 tag reading and writing from byte buffers
//! - A typed field model for every frame body layout, with opaque
//!   pass-through for unknown frames
//! - Text encoding negotiation per version
//! - Cross-version conversion (including year/date/time folding)
//! - Logical field access (title, track "n/m", pictures, comments)
//! - ID3v1/v1.1 trailers and conversion to and from v2
//!
//! # Example
//!
//! ```rust,no_run
//! use soul_id3::{convert_tag, read_tag, tag_region, write_tag, FieldKey, TagVersion};
//! # fn example(file: &[u8]) -> soul_id3::Result<()> {
//! let region = tag_region(file);
//! let tag = read_tag(file)?;
//! println!("{:?}", tag.get(FieldKey::Title));
//!
//! let (mut converted, report) = convert_tag(&tag, TagVersion::V2_4)?;
//! converted.set(FieldKey::Album, "Music Has the Right to Children")?;
//! let bytes = write_tag(&converted, region.v2_len())?;
//! # let _ = (report, bytes);
//! # Ok(())
//! # }
//! ```
//!
//! File access is left to the caller: everything here consumes and produces
//! byte buffers.

mod body;
mod convert;
mod encoding;
mod error;
mod field;
mod fields;
mod frame;
mod frame_id;
pub mod genre;
mod locate;
mod policy;
mod registry;
mod syncsafe;
mod tag;
mod v1;
mod version;

pub use body::{BodyKind, EncodingRules, Field, FieldBody, FrameBody, UnsupportedBody};
pub use convert::{
    convert_tag, image_format_for_mime, mime_for_image_format, split_timestamp, v22_to_v23,
    v23_to_v22, ConversionReport, Converter, TimestampAccumulator, TimestampFold,
    TimestampParts,
};
pub use encoding::{negotiate, select_encoding, TextEncoding};
pub use error::{FieldError, Id3Error, Result};
pub use field::{FieldKind, FieldName, FieldValue};
pub use fields::{Comment, FieldKey, Picture, PictureType};
pub use frame::{
    EncodedFrame, Frame, FrameFlags, FrameHeader, FrameOutcome, FrameRead, FrameReader, Provenance,
};
pub use frame_id::FrameId;
pub use locate::{tag_region, TagRegion};
pub use policy::Policy;
pub use registry::{create, create_empty, is_repeatable, lookup, FrameInfo};
pub use syncsafe::{
    decode as decode_sync_safe, encode as encode_sync_safe, resynchronise, unsynchronise,
    MAX_SYNC_SAFE,
};
pub use tag::{
    frame_order, read_tag, read_tag_with, write_tag, ExtendedHeader, ReadDiagnostics, ScanStop,
    Substitution, Tag, TagFlags, TagHeader, TagRestrictions, TagWriter, WriteReport,
};
pub use v1::{V1Tag, V1_LEN};
pub use version::{FrameLayout, TagVersion};
