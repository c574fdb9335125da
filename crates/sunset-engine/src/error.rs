//! Error types for the console driver.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup and the console loop.

/// Top-level error for the console driver.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: sunset_core::ConfigError,
    },

    /// Opening the save store failed.
    #[error("save store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: sunset_db::DbError,
    },

    /// Loading the existing save failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: sunset_core::SessionError,
    },

    /// Reading commands or writing output failed.
    #[error("console I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
