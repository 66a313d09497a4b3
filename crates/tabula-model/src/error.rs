//! Error types for model parsing.

use thiserror::Error;

/// Errors raised when converting text into model types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The name does not match any canonical field.
    #[error("unknown canonical field: {0}")]
    UnknownField(String),

    /// The name does not match any job status.
    #[error("unknown job status: {0}")]
    UnknownStatus(String),

    /// The name does not match any price range bucket.
    #[error("unknown price range: {0}")]
    UnknownPriceRange(String),
}
