/// Tagger configuration
use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};
use soul_id3::{Policy, TagVersion};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaggerConfig {
    #[serde(default)]
    pub policy: Policy,

    /// Version of tags created from scratch
    #[serde(default = "default_new_tag_version")]
    pub new_tag_version: TagVersion,

    /// Refresh an existing ID3v1 trailer when the v2 tag is edited
    #[serde(default = "default_sync_v1")]
    pub sync_v1: bool,
}

impl TaggerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `soul-tagger.toml` in the working
    /// directory. Environment variables use the `SOUL_TAGGER_` prefix and
    /// `__` between levels, e.g. `SOUL_TAGGER_POLICY__PADDING=0`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = path.map_or_else(|| PathBuf::from("soul-tagger.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(TaggerError::Config(format!(
                "config file {} does not exist",
                config_path.display()
            )));
        }

        // Override with environment variables (prefixed with SOUL_TAGGER_)
        settings = settings.add_source(
            config::Environment::with_prefix("SOUL_TAGGER")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| TaggerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| TaggerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.new_tag_version.is_v2() {
            return Err(TaggerError::Config(format!(
                "new tags must be ID3v2, not {}",
                self.new_tag_version
            )));
        }
        if self.policy.padding > soul_id3::MAX_SYNC_SAFE as usize {
            return Err(TaggerError::Config(format!(
                "padding of {} bytes does not fit in a tag",
                self.policy.padding
            )));
        }
        Ok(())
    }
}

// Default values
fn default_new_tag_version() -> TagVersion {
    TagVersion::V2_4
}

fn default_sync_v1() -> bool {
    true
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            new_tag_version: default_new_tag_version(),
            sync_v1: default_sync_v1(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_file_values_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "sync_v1 = false\n\n[policy]\npadding = 0").unwrap();

        let config = TaggerConfig::load(Some(file.path())).unwrap();
        assert!(!config.sync_v1);
        assert_eq!(config.policy.padding, 0);
        assert_eq!(config.new_tag_version, TagVersion::V2_4);
        config.validate().unwrap();
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = TaggerConfig::load(Some(Path::new("/nonexistent/soul-tagger.toml")));
        assert!(matches!(result, Err(TaggerError::Config(_))));
    }

    #[test]
    fn v1_is_not_a_valid_new_tag_version() {
        let config = TaggerConfig {
            new_tag_version: TagVersion::V1,
            ..TaggerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
