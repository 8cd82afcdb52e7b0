//! Soul Tagger Library
//!
//! Command line inspection and editing of ID3 tags on top of `soul-id3`.
//!
//! This library exposes the commands for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::{DumpReport, FrameSummary, TagFile};
pub use config::TaggerConfig;
pub use error::{Result, TaggerError};
