//! Server configuration, fixed at startup.
//!
//! Configurations are JSON objects like:
//! ```json
//! {"root_fs": "/mnt/host", "enabled_listings": ["firmware", "sonic-image"]}
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fsquery_fs::RootFs;
use serde::{Deserialize, Serialize};

use crate::classify::ListingKind;

/// Errors loading or validating a [`Config`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("root_fs must be an absolute path, got '{0}'")]
    RelativeRoot(String),
}

/// Immutable configuration handed to the dispatcher at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the device filesystem is mounted. Empty or `/` disables
    /// confinement.
    pub root_fs: String,
    /// Listing resources that may be served.
    pub enabled_listings: BTreeSet<ListingKind>,
}

impl Config {
    pub fn new(root_fs: impl Into<String>) -> Self {
        Self {
            root_fs: root_fs.into(),
            enabled_listings: BTreeSet::new(),
        }
    }

    /// Enable a listing resource.
    #[must_use]
    pub fn enable(mut self, kind: ListingKind) -> Self {
        self.enabled_listings.insert(kind);
        self
    }

    pub fn is_enabled(&self, kind: ListingKind) -> bool {
        self.enabled_listings.contains(&kind)
    }

    pub fn rootfs(&self) -> RootFs {
        RootFs::new(&self.root_fs)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root_fs.is_empty() && !Path::new(&self.root_fs).has_root() {
            return Err(ConfigError::RelativeRoot(self.root_fs.clone()));
        }
        Ok(())
    }
}
