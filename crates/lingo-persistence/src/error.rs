//! Error types for the chat state file.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the state file.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to read the state file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the state file.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the directory holding the state file.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State could not be encoded or decoded as JSON.
    #[error("invalid state JSON: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
