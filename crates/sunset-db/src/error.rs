//! Error types for the persistence layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`std::io`] and [`serde_json`] errors with the key or path involved.

/// Errors that can occur while reading or writing saved state.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A key was not found in the store.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// A key holds a value of a different kind than requested.
    #[error("Key {key} holds {found}, expected {expected}")]
    TypeMismatch {
        /// The key that was read.
        key: String,
        /// The kind the caller asked for.
        expected: &'static str,
        /// The kind actually stored.
        found: &'static str,
    },

    /// Load was requested but no save exists.
    #[error("No save data found")]
    NoSaveData,
}
