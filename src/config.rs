//! TOML configuration for [`JsonStore`](crate::JsonStore).
//!
//! Every key is optional:
//!
//! ```toml
//! durability = "strict"   # or "file_only"
//! checksum = "compute"    # or "omit"
//! pretty = true
//! ```

use persistkit_durability::{ChecksumPolicy, DurabilityMode, PersistOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading a [`PersistConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The config text is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Serializable store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistConfig {
    /// Sync behaviour of each save
    pub durability: DurabilityMode,
    /// Whether saves record a checksum
    pub checksum: ChecksumPolicy,
    /// Pretty-print envelopes
    pub pretty: bool,
}

impl PersistConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Writer options equivalent to this config.
    pub fn to_options(&self) -> PersistOptions {
        PersistOptions::new()
            .durability(self.durability)
            .checksum(self.checksum)
            .pretty(self.pretty)
    }
}

impl Default for PersistConfig {
    fn default() -> Self {
        let options = PersistOptions::default();
        Self {
            durability: options.durability,
            checksum: options.checksum,
            pretty: options.pretty,
        }
    }
}
