//! Loading stage of the tabula pipeline.
//!
//! Writes cleaned products into a [`Repository`](tabula_store::Repository) in
//! sequential batches while a [`JobTracker`] persists the run's lifecycle.
//! After loading, category insights and a trend snapshot are regenerated
//! over the full store.
//!
//! Maintenance operations live on the same [`Loader`]: job lookup, the
//! integrity sweep, and retention cleanup.

pub mod error;
pub mod insights;
pub mod integrity;
pub mod job;
pub mod loader;

// === Errors ===
pub use error::{LoadError, Result};

// === Loading ===
pub use loader::{
    BatchProgress, CleanupReport, DEFAULT_BATCH_SIZE, DEFAULT_SUCCESS_THRESHOLD, LoadOptions,
    Loader, ProgressObserver,
};

// === Jobs ===
pub use job::JobTracker;

// === Insights and integrity ===
pub use insights::{InsightSummary, build_trend_snapshot, regenerate_insights};
pub use integrity::check_integrity;
