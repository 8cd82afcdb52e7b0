/// Tagger error types
use soul_id3::Id3Error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaggerError>;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(#[from] Id3Error),

    #[error("{0} has no tag to work on")]
    NoTag(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
