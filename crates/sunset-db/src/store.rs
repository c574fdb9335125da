//! The flat key-value store that save data lives in.
//!
//! Values are integers, floats, or strings. Stores apply a batch of writes
//! all at once or not at all, so a failed save leaves the previous save as
//! it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    /// Integer value (enum codes, flags, the day).
    Int(i64),
    /// Floating point value (settings).
    Float(f64),
    /// String value (delimited lists).
    Text(String),
}

impl StoreValue {
    /// Name of the value's kind, for error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for StoreValue {
    fn from(value: bool) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A flat key-value store.
pub trait KeyValueStore {
    /// Read the value at `key`.
    fn get(&self, key: &str) -> Option<StoreValue>;

    /// Whether `key` holds a value.
    fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Write every entry, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing medium rejects the write. The
    /// store's contents are unchanged in that case.
    fn write_batch(&mut self, entries: Vec<(String, StoreValue)>) -> Result<(), DbError>;

    /// Remove every listed key. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing medium rejects the write.
    fn delete_keys(&mut self, keys: &[String]) -> Result<(), DbError>;

    /// Read an integer.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::KeyNotFound`] or [`DbError::TypeMismatch`].
    fn get_int(&self, key: &str) -> Result<i64, DbError> {
        match self.get(key) {
            Some(StoreValue::Int(value)) => Ok(value),
            Some(other) => Err(mismatch(key, "int", &other)),
            None => Err(DbError::KeyNotFound(key.to_owned())),
        }
    }

    /// Read a float. Integers are widened.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::KeyNotFound`] or [`DbError::TypeMismatch`].
    #[allow(clippy::cast_precision_loss)]
    fn get_float(&self, key: &str) -> Result<f64, DbError> {
        match self.get(key) {
            Some(StoreValue::Float(value)) => Ok(value),
            Some(StoreValue::Int(value)) => Ok(value as f64),
            Some(other) => Err(mismatch(key, "float", &other)),
            None => Err(DbError::KeyNotFound(key.to_owned())),
        }
    }

    /// Read a string.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::KeyNotFound`] or [`DbError::TypeMismatch`].
    fn get_text(&self, key: &str) -> Result<String, DbError> {
        match self.get(key) {
            Some(StoreValue::Text(value)) => Ok(value),
            Some(other) => Err(mismatch(key, "text", &other)),
            None => Err(DbError::KeyNotFound(key.to_owned())),
        }
    }
}

fn mismatch(key: &str, expected: &'static str, found: &StoreValue) -> DbError {
    DbError::TypeMismatch {
        key: key.to_owned(),
        expected,
        found: found.kind_name(),
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, StoreValue>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a single value directly.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StoreValue>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.entries.get(key).cloned()
    }

    fn write_batch(&mut self, entries: Vec<(String, StoreValue)>) -> Result<(), DbError> {
        self.entries.extend(entries);
        Ok(())
    }

    fn delete_keys(&mut self, keys: &[String]) -> Result<(), DbError> {
        for key in keys {
            self.entries.remove(key);
        }
        Ok(())
    }
}
