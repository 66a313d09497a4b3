//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Plain insert of a key that already exists.
    #[error("duplicate key: {key}")]
    Duplicate { key: String },

    /// Update of a row that does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not a store snapshot.
    #[error("invalid store file {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Snapshot written by a newer schema.
    #[error("store file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Snapshot could not be encoded or decoded.
    #[error("failed to serialize store data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
