//! Storage layer for taskflow
//!
//! A small key/value string store in the spirit of browser local storage.
//! Each key is one value; callers decide what the value encodes.
//!
//! # Directory Structure
//!
//! ```text
//! <data dir>/
//!   taskflow.toml               # Optional configuration
//!   tasks.json                  # Task collection (JSON array), key "tasks"
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};

/// Extension used for files backing a storage key
pub const VALUE_EXTENSION: &str = "json";

/// Key/value persistence used by the task store.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Platform data directory for taskflow, if the platform has one.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taskflow").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Check that a key can be used as a file stem.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidArgument("storage key cannot be empty".to_string()));
    }
    if !key
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(Error::InvalidArgument(format!(
            "storage key '{key}' must be alphanumeric, '-' or '_'"
        )));
    }
    Ok(())
}

/// File-backed storage: one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory holding one file per key
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage rooted at the platform data directory
    pub fn in_default_dir() -> Result<Self> {
        let dir = default_data_dir().ok_or_else(|| {
            Error::InvalidConfig(
                "no data directory available; pass --dir or set TASKFLOW_DIR".to_string(),
            )
        })?;
        Ok(Self::new(dir))
    }

    /// Directory holding the stored values
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{VALUE_EXTENSION}"))
    }

    /// Write data atomically using temp file + rename
    ///
    /// Readers see either the previous value or the new one, never a
    /// truncated file.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.path_for(key);
        self.write_atomic(&path, value.as_bytes())
    }
}

/// In-memory storage. Counts writes so callers can observe persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one value
    pub fn with_item(key: &str, value: impl Into<String>) -> Self {
        let mut items = HashMap::new();
        items.insert(key.to_string(), value.into());
        Self { items, writes: 0 }
    }

    /// Number of `set_item` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Raw stored value, bypassing the trait
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
