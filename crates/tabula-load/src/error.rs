//! Load error types.

use tabula_model::JobStatus;
use tabula_store::StoreError;
use thiserror::Error;

/// Failures that stop a load or a maintenance operation.
///
/// Per-record and per-batch store failures are not errors; they are counted
/// in the [`LoadResult`](tabula_model::LoadResult).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The store failed where no recovery is possible (job row writes,
    /// maintenance reads).
    #[error("store operation failed")]
    Store(#[from] StoreError),

    /// A job status change the lifecycle does not allow.
    #[error("job {job_id}: cannot move from {from} to {to}")]
    InvalidTransition {
        job_id: String,
        from: JobStatus,
        to: JobStatus,
    },
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
