//! Configuration loading and management
//!
//! Handles parsing of the optional `taskflow.toml` in the data directory.

use serde::Deserialize;
use std::path::Path;

use crate::dashboard::DEFAULT_RECENT_LIMIT;
use crate::filter::FilterKey;
use crate::storage;
use crate::store::DEFAULT_STORAGE_KEY;

/// File name of the configuration inside the data directory
pub const CONFIG_FILE: &str = "taskflow.toml";

const MAX_RECENT_LIMIT: usize = 50;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Storage key (file stem) holding the task collection
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Number of recent tasks on the dashboard
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Filter applied by `list` when none is given
    #[serde(default)]
    pub default_filter: FilterKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            recent_limit: default_recent_limit(),
            default_filter: FilterKey::default(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Config {
    /// Load configuration from a `taskflow.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        storage::validate_key(&self.storage_key).map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "storage_key '{}' must be non-empty and alphanumeric, '-' or '_'",
                self.storage_key
            ))
        })?;
        if self.recent_limit == 0 || self.recent_limit > MAX_RECENT_LIMIT {
            return Err(crate::error::Error::InvalidConfig(format!(
                "recent_limit must be between 1 and {MAX_RECENT_LIMIT}"
            )));
        }
        Ok(())
    }
}
