//! Error types for data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an extraction.
///
/// Malformed rows are not errors; they are reported as
/// [`ParseIssue`](tabula_model::ParseIssue)s alongside the parsed records.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Content Errors ===
    /// Input has a byte-order mark for an encoding other than UTF-8.
    #[error("unsupported encoding: {encoding} (input must be UTF-8)")]
    UnsupportedEncoding { encoding: &'static str },

    /// Input contains no data at all.
    #[error("input is empty")]
    EmptyInput,

    /// The first row could not be read as a header.
    #[error("could not read header row: {reason}")]
    NoHeaderDetected { reason: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
