//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! The whole map is held in memory and rewritten on every mutation, which suits
//! the handful of small entries the client keeps.

use crate::domain::error::{MovieManiaError, Result};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk container format.
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "movie-mania-auth": "{\"user\":{...},\"accessToken\":\"...\"}"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`; the runtime owns it exclusively.
#[derive(Debug)]
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage file.
    ///
    /// Parent directories are created automatically. A file that cannot be
    /// parsed is moved aside to `<name>.json.corrupt` and the store starts
    /// empty, so a damaged session never blocks startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, or the
    /// existing file cannot be read or moved aside.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            match Self::load_from_file(&file_path) {
                Ok(data) => data,
                Err(MovieManiaError::Storage(reason)) => Self::set_aside(&file_path, &reason)?,
                Err(e) => return Err(e),
            }
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Opens `storage.json` inside `data_dir`.
    ///
    /// # Errors
    ///
    /// See [`JsonStorage::new`].
    pub fn in_dir(data_dir: &Path) -> Result<Self> {
        Self::new(data_dir.join("storage.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| MovieManiaError::Storage(format!("failed to parse {}: {e}", path.display())))?;

        tracing::debug!(version = data.version, entries = data.entries.len(), "loaded storage data");
        Ok(data)
    }

    fn set_aside(path: &Path, reason: &str) -> Result<StorageData> {
        let backup = path.with_extension("json.corrupt");
        tracing::warn!(path = ?path, backup = ?backup, error = %reason, "storage file is corrupt, starting empty");
        std::fs::rename(path, &backup)?;
        Ok(StorageData::default())
    }

    /// Writes to a temporary file, then renames it over the target.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| MovieManiaError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _span = tracing::debug_span!("json_get_item", key).entered();

        let value = self.data.entries.get(key).cloned();
        tracing::debug!(found = value.is_some(), "lookup complete");
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set_item", key, bytes = value.len()).entered();

        if self.data.entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.data.entries.insert(key.to_string(), value.to_string());
        self.dirty = true;
        self.save_to_file()
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_remove_item", key).entered();

        if self.data.entries.remove(key).is_none() {
            tracing::debug!("key absent, nothing to remove");
            return Ok(());
        }
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        {
            let mut storage = JsonStorage::new(path.clone()).unwrap();
            storage.set_item("a", "1").unwrap();
            storage.set_item("b", "2").unwrap();
            storage.remove_item("b").unwrap();
        }

        let storage = JsonStorage::new(path).unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get_item("b").unwrap(), None);
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonStorage::in_dir(dir.path()).unwrap();
        storage.remove_item("nope").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn corrupt_file_is_set_aside_and_store_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{truncated").unwrap();

        let mut storage = JsonStorage::in_dir(dir.path()).unwrap();
        assert_eq!(storage.get_item("movie-mania-auth").unwrap(), None);

        let backup = dir.path().join("storage.json.corrupt");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{truncated");
        assert!(!path.exists());

        storage.set_item("k", "v").unwrap();
        drop(storage);
        let reopened = JsonStorage::in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonStorage::in_dir(dir.path()).unwrap();
        storage.set_item("k", "v").unwrap();
        assert!(storage.path().exists());
        assert!(!storage.path().with_extension("tmp").exists());
    }
}
