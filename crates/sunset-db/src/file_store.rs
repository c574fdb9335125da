//! JSON file-backed store.
//!
//! The whole store is one JSON object on disk. Every write serializes the
//! would-be contents to a sibling temp file and renames it over the real
//! file, so a crash or a failed write leaves the previous file intact. The
//! in-memory map is only updated once the rename succeeds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DbError;
use crate::store::{KeyValueStore, StoreValue};

/// A [`KeyValueStore`] persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, StoreValue>,
}

impl FileStore {
    /// Open the store at `path`. A missing file yields an empty store; the
    /// file is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the file exists but cannot be read, or
    /// [`DbError::Serialization`] if it is not a JSON object of values.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            tracing::debug!(path = %path.display(), "Save file not found, starting empty");
            BTreeMap::new()
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "Opened file store");
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `next` to disk and, on success, adopt it as the current state.
    fn commit(&mut self, next: BTreeMap<String, StoreValue>) -> Result<(), DbError> {
        let json = serde_json::to_string_pretty(&next)?;
        let temp = self.temp_path();

        if let Err(e) = fs::write(&temp, json).and_then(|()| fs::rename(&temp, &self.path)) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write save file");
            // Best effort: the temp file is garbage either way.
            let _ = fs::remove_file(&temp);
            return Err(DbError::Io(e));
        }

        tracing::debug!(path = %self.path.display(), keys = next.len(), "Committed file store");
        self.entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.entries.get(key).cloned()
    }

    fn write_batch(&mut self, entries: Vec<(String, StoreValue)>) -> Result<(), DbError> {
        let mut next = self.entries.clone();
        next.extend(entries);
        self.commit(next)
    }

    fn delete_keys(&mut self, keys: &[String]) -> Result<(), DbError> {
        let mut next = self.entries.clone();
        for key in keys {
            next.remove(key);
        }
        self.commit(next)
    }
}
