//! JSON file-based key-value store.
//!
//! The whole map is held in memory and rewritten on every change using an
//! atomic write (write-to-temp + rename), so a crash never leaves a half-written
//! file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "token": { "value": "eyJhbGciOi...", "saved_at": 1730000000 }
//!   }
//! }
//! ```

use crate::domain::error::{ConsoleError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    /// Unix timestamp of the last write.
    saved_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, StoredValue>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file key-value store.
#[derive(Debug)]
pub struct JsonKeyValueStore {
    file_path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl JsonKeyValueStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, or the file
    /// exists but cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cafe_console::storage::{JsonKeyValueStore, KeyValueStore};
    /// use std::path::PathBuf;
    ///
    /// let mut store = JsonKeyValueStore::open(PathBuf::from("/tmp/cafe-console.json"))?;
    /// store.set("token", "abc")?;
    /// # Ok::<(), cafe_console::ConsoleError>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening key-value store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(entries = data.entries.len(), "key-value store ready");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| ConsoleError::Storage(format!("failed to parse JSON: {e}")))?;
        tracing::debug!(version = data.version, entries = data.entries.len(), "loaded store data");
        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ConsoleError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.entries.get(key).map(|v| v.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("kv_set", key = %key).entered();

        self.data.entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                saved_at: chrono::Utc::now().timestamp(),
            },
        );
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("kv_remove", key = %key).entered();

        if self.data.entries.remove(key).is_some() {
            self.dirty = true;
        }
        self.save_to_file()
    }
}

impl Drop for JsonKeyValueStore {
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
        let path = dir.path().join("nested").join("store.json");

        {
            let mut store = JsonKeyValueStore::open(path.clone()).unwrap();
            assert_eq!(store.get("token").unwrap(), None);
            store.set("token", "abc").unwrap();
        }

        let store = JsonKeyValueStore::open(path.clone()).unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn remove_is_persisted_and_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonKeyValueStore::open(path.clone()).unwrap();
        store.set("token", "abc").unwrap();
        store.remove("token").unwrap();
        store.remove("token").unwrap();
        drop(store);

        let store = JsonKeyValueStore::open(path).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn file_records_write_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonKeyValueStore::open(path.clone()).unwrap();
        store.set("token", "abc").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["entries"]["token"]["value"], "abc");
        assert!(raw["entries"]["token"]["saved_at"].as_i64().unwrap() > 0);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonKeyValueStore::open(path).unwrap_err();
        assert!(matches!(err, ConsoleError::Storage(_)));
    }
}
