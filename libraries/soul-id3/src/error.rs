/// ID3-specific errors
use crate::version::TagVersion;
use thiserror::Error;

/// Result type alias using `Id3Error`
pub type Result<T> = std::result::Result<T, Id3Error>;

/// ID3 error types
#[derive(Error, Debug)]
pub enum Id3Error {
    /// No tag magic at the expected position
    #[error("No ID3 tag found")]
    TagNotFound,

    /// Major version outside 2..=4
    #[error("Unsupported ID3v2 version: 2.{0}")]
    UnsupportedVersion(u8),

    /// A tag-level feature this codec cannot decode
    #[error("Unsupported tag feature: {0}")]
    UnsupportedFeature(String),

    /// Buffer ended before a fixed structure was complete
    #[error("Truncated data: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    /// Malformed extended header
    #[error("Invalid extended header: {0}")]
    InvalidExtendedHeader(String),

    /// Identifier bytes that are neither padding nor `[A-Z0-9]`
    #[error("Invalid frame identifier: {0:02X?}")]
    InvalidFrameIdentifier(Vec<u8>),

    /// A field of a frame body failed to decode or encode
    #[error("Invalid data in frame {frame}: {source}")]
    InvalidFrameData {
        frame: String,
        #[source]
        source: FieldError,
    },

    /// No mapping for a frame kind into the target version
    #[error("Frame {frame} has no equivalent in {target}")]
    ConversionUnavailable { frame: String, target: TagVersion },

    /// Frame or tag exceeds what the size field can express
    #[error("Too large for the size field: {0} bytes")]
    TooLarge(usize),

    /// Value rejected by a setter
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Id3Error {
    /// Create an invalid frame data error
    pub fn invalid_data(frame: impl Into<String>, source: FieldError) -> Self {
        Self::InvalidFrameData {
            frame: frame.into(),
            source,
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }
}

/// Failures of a single field codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Fewer bytes left than a fixed-width field needs
    #[error("field needs {need} bytes, {have} left")]
    Truncated { need: usize, have: usize },

    /// UTF-16 string ended on an odd byte before a terminator
    #[error("UTF-16 string ends on an odd byte offset")]
    OddUtf16Length,

    /// Encoding byte outside 0..=3
    #[error("unknown text encoding byte {0:#04x}")]
    UnknownEncoding(u8),

    /// Integer wider than 64 bits
    #[error("integer of {0} bytes does not fit in 64 bits")]
    IntegerOverflow(usize),

    /// Stored value does not match the field's codec kind
    #[error("value of field {0} has the wrong type")]
    TypeMismatch(&'static str),

    /// Fixed-width integer value too large for its width
    #[error("value {value} does not fit in {width} bytes")]
    ValueTooWide { value: u64, width: usize },

    /// Decompression of a compressed frame failed
    #[error("decompression failed: {0}")]
    Decompression(String),
}
