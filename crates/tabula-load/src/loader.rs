//! Batched loading of cleaned records.

use std::time::Instant;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tabula_model::{
    CleanedRecord, EtlJob, IntegrityReport, LoadResult, MAX_JOB_ERROR_MESSAGES,
};
use tabula_store::{Repository, StoreError};

use crate::error::Result;
use crate::insights::{InsightSummary, regenerate_insights};
use crate::integrity::check_integrity;
use crate::job::JobTracker;

/// Default number of records per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default share of failed records below which a load counts as a success.
pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 0.5;

/// Options for [`Loader::load`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Records per batch; 0 is treated as 1.
    pub batch_size: usize,
    /// Replace existing products instead of inserting.
    pub upsert: bool,
    /// With `upsert` off, count existing products as skipped, not errors.
    pub skip_duplicates: bool,
    /// Recompute category insights and append a trend snapshot afterwards.
    pub generate_insights: bool,
    /// A load succeeds while `records_error < total * success_threshold`.
    pub success_threshold: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            upsert: true,
            skip_duplicates: true,
            generate_insights: true,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
        }
    }
}

/// Progress after one completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based index of the batch just finished.
    pub batch_index: usize,
    pub batch_count: usize,
    /// Records handled so far, this batch included.
    pub records_processed: u64,
    pub total_records: u64,
}

/// Receives progress after every batch.
pub trait ProgressObserver {
    fn on_batch(&self, progress: &BatchProgress);
}

impl<F: Fn(&BatchProgress)> ProgressObserver for F {
    fn on_batch(&self, progress: &BatchProgress) {
        self(progress);
    }
}

/// What a retention cleanup removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub jobs_removed: usize,
    pub trends_removed: usize,
}

#[derive(Debug, Default)]
struct BatchCounts {
    success: u64,
    error: u64,
    skipped: u64,
    messages: Vec<String>,
}

/// Loads cleaned records into a repository, tracking the run as a job.
pub struct Loader<'r, R: Repository + ?Sized> {
    repo: &'r R,
    observer: Option<&'r dyn ProgressObserver>,
}

impl<'r, R: Repository + ?Sized> Loader<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self {
            repo,
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: &'r dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Loads `records` in sequential batches.
    ///
    /// Record and batch failures are counted, never returned. The call fails
    /// only when the job row itself cannot be created or updated; the job is
    /// then marked failed on a best-effort basis.
    pub fn load(
        &self,
        records: &[CleanedRecord],
        file_name: &str,
        options: &LoadOptions,
    ) -> Result<LoadResult> {
        let started = Instant::now();
        let mut tracker = JobTracker::start(self.repo, file_name)?;

        let batch_size = options.batch_size.max(1);
        let batch_count = records.len().div_ceil(batch_size);
        let total = records.len() as u64;
        let mut totals = BatchCounts::default();
        let mut errors: Vec<String> = Vec::new();

        tracing::info!(
            job_id = %tracker.id(),
            records = records.len(),
            batches = batch_count,
            batch_size,
            "Loading records"
        );

        for (idx, batch) in records.chunks(batch_size).enumerate() {
            let batch_index = idx + 1;
            let counts = self.load_batch(batch, batch_index, options);
            for message in counts.messages {
                tracker.add_error(message.clone());
                push_bounded(&mut errors, message);
            }

            totals.success += counts.success;
            totals.error += counts.error;
            totals.skipped += counts.skipped;

            if let Err(e) =
                tracker.record_batch(batch.len() as u64, counts.success, counts.error)
            {
                return Err(abort(&mut tracker, e));
            }

            let progress = BatchProgress {
                batch_index,
                batch_count,
                records_processed: tracker.job().records_processed,
                total_records: total,
            };
            tracing::debug!(
                job_id = %tracker.id(),
                batch = batch_index,
                processed = progress.records_processed,
                "Batch complete"
            );
            if let Some(observer) = self.observer {
                observer.on_batch(&progress);
            }
        }

        if options.generate_insights
            && let Err(e) = regenerate_insights(self.repo)
        {
            tracing::warn!(job_id = %tracker.id(), error = %e, "Insight generation failed");
            let message = format!("Insight generation failed: {e}");
            tracker.add_error(message.clone());
            push_bounded(&mut errors, message);
        }

        let status = match tracker.finish() {
            Ok(status) => status,
            Err(e) => return Err(abort(&mut tracker, e)),
        };

        let success = (totals.error as f64) < total as f64 * options.success_threshold;

        let result = LoadResult {
            job_id: tracker.id().to_string(),
            status,
            total_records: total,
            records_success: totals.success,
            records_error: totals.error,
            records_skipped: totals.skipped,
            batches: batch_count,
            duration_ms: started.elapsed().as_millis() as u64,
            errors,
            success,
        };
        tracing::info!(
            job_id = %result.job_id,
            status = %result.status,
            success = result.records_success,
            errors = result.records_error,
            skipped = result.records_skipped,
            duration_ms = result.duration_ms,
            "Load complete"
        );
        Ok(result)
    }

    fn load_batch(
        &self,
        batch: &[CleanedRecord],
        batch_index: usize,
        options: &LoadOptions,
    ) -> BatchCounts {
        let mut counts = BatchCounts::default();

        if let Err(e) = self.repo.begin_batch() {
            tracing::warn!(batch = batch_index, error = %e, "Batch could not start");
            counts.messages.push(format!("Batch {batch_index}: {e}"));
            counts.error = batch.len() as u64;
            return counts;
        }

        for record in batch {
            let outcome = if options.upsert {
                self.repo.upsert_product(record)
            } else {
                self.repo.insert_product(record)
            };
            match outcome {
                Ok(()) => counts.success += 1,
                Err(StoreError::Duplicate { .. }) if options.skip_duplicates => {
                    counts.skipped += 1;
                }
                Err(e) => {
                    counts.error += 1;
                    counts.messages.push(format!("Product {}: {e}", record.product_id));
                }
            }
        }

        if let Err(e) = self.repo.commit_batch() {
            tracing::warn!(batch = batch_index, error = %e, "Batch could not be committed");
            counts.messages.push(format!("Batch {batch_index}: {e}"));
            counts.error += counts.success;
            counts.success = 0;
        }
        counts
    }

    /// Reads one job.
    pub fn job_status(&self, job_id: &str) -> Result<Option<EtlJob>> {
        Ok(self.repo.get_job(job_id)?)
    }

    /// Up to `limit` jobs, newest first.
    pub fn recent_jobs(&self, limit: usize) -> Result<Vec<EtlJob>> {
        Ok(self.repo.recent_jobs(limit)?)
    }

    /// Recomputes insights without loading anything.
    pub fn regenerate_insights(&self) -> Result<InsightSummary> {
        regenerate_insights(self.repo)
    }

    /// Sweeps every stored product for invariant violations.
    pub fn validate_data_integrity(&self) -> Result<IntegrityReport> {
        let products = self.repo.all_products()?;
        let report = check_integrity(&products);
        if report.is_valid {
            tracing::info!(products = report.total_products, "Integrity check passed");
        } else {
            tracing::warn!(
                products = report.total_products,
                issues = report.issues.len(),
                "Integrity check found issues"
            );
        }
        Ok(report)
    }

    /// Deletes finished jobs and trend snapshots older than `retention_days`.
    ///
    /// Jobs that have not reached a terminal state are kept regardless of age.
    pub fn cleanup_old_data(&self, retention_days: u32) -> Result<CleanupReport> {
        let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
        let report = CleanupReport {
            jobs_removed: self.repo.delete_jobs_before(cutoff)?,
            trends_removed: self.repo.delete_trends_before(cutoff)?,
        };
        tracing::info!(
            retention_days,
            jobs = report.jobs_removed,
            trends = report.trends_removed,
            "Cleaned up old data"
        );
        Ok(report)
    }
}

fn push_bounded(errors: &mut Vec<String>, message: String) {
    if errors.len() < MAX_JOB_ERROR_MESSAGES {
        errors.push(message);
    }
}

/// Marks the job failed, best effort, and hands back the original error.
fn abort<R: Repository + ?Sized>(
    tracker: &mut JobTracker<'_, R>,
    error: crate::error::LoadError,
) -> crate::error::LoadError {
    if let Err(fail_error) = tracker.fail(&error.to_string()) {
        tracing::error!(
            job_id = %tracker.id(),
            error = %fail_error,
            "Could not mark job as failed"
        );
    }
    error
}
