//! Job lifecycle tracking.
//!
//! A job moves `started → processing → completed | completed_with_errors`,
//! with `failed` reachable from either non-terminal state. Every change is
//! written through the repository so a concurrent reader can poll progress.

use chrono::Utc;
use tabula_model::{EtlJob, JobStatus};
use tabula_store::Repository;
use uuid::Uuid;

use crate::error::{LoadError, Result};

/// Owns one [`EtlJob`] row for the duration of a load.
pub struct JobTracker<'r, R: Repository + ?Sized> {
    repo: &'r R,
    job: EtlJob,
}

impl<'r, R: Repository + ?Sized> JobTracker<'r, R> {
    /// Creates the job row in the `started` state.
    pub fn start(repo: &'r R, file_name: &str) -> Result<Self> {
        let job = EtlJob::new(Uuid::new_v4().to_string(), file_name, Utc::now());
        repo.create_job(&job)?;
        tracing::info!(job_id = %job.id, file = file_name, "Started job");
        Ok(Self { repo, job })
    }

    pub fn job(&self) -> &EtlJob {
        &self.job
    }

    pub fn id(&self) -> &str {
        &self.job.id
    }

    /// Queues an error message for the next job write.
    ///
    /// Messages beyond the bound are dropped.
    pub fn add_error(&mut self, message: impl Into<String>) {
        if !self.job.push_error(message) {
            tracing::trace!(job_id = %self.job.id, "Job error log full");
        }
    }

    /// Adds one batch's counts and moves the job to `processing`.
    pub fn record_batch(&mut self, processed: u64, success: u64, error: u64) -> Result<()> {
        self.transition(JobStatus::Processing)?;
        self.job.records_processed += processed;
        self.job.records_success += success;
        self.job.records_error += error;
        self.repo.update_job(&self.job)?;
        Ok(())
    }

    /// Completes the job, with errors if any record failed.
    pub fn finish(&mut self) -> Result<JobStatus> {
        let status = if self.job.records_error == 0 {
            JobStatus::Completed
        } else {
            JobStatus::CompletedWithErrors
        };
        self.close(status)?;
        tracing::info!(
            job_id = %self.job.id,
            status = %status,
            processed = self.job.records_processed,
            errors = self.job.records_error,
            "Finished job"
        );
        Ok(status)
    }

    /// Marks the job failed with a reason.
    pub fn fail(&mut self, reason: &str) -> Result<()> {
        self.add_error(reason);
        self.close(JobStatus::Failed)?;
        tracing::error!(job_id = %self.job.id, reason, "Job failed");
        Ok(())
    }

    /// Writes the terminal state; the in-memory job only changes once the
    /// write lands, so a refused close can still be followed by `fail`.
    fn close(&mut self, status: JobStatus) -> Result<()> {
        self.check_transition(status)?;
        let end = Utc::now();
        let elapsed = (end - self.job.start_time).num_milliseconds().max(0);
        let mut closed = self.job.clone();
        closed.status = status;
        closed.end_time = Some(end);
        closed.duration_ms = Some(elapsed as u64);
        self.repo.update_job(&closed)?;
        self.job = closed;
        Ok(())
    }

    fn transition(&mut self, next: JobStatus) -> Result<()> {
        self.check_transition(next)?;
        self.job.status = next;
        Ok(())
    }

    fn check_transition(&self, next: JobStatus) -> Result<()> {
        if !self.job.status.can_transition_to(next) {
            return Err(LoadError::InvalidTransition {
                job_id: self.job.id.clone(),
                from: self.job.status,
                to: next,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_store::MemoryRepository;

    #[test]
    fn test_lifecycle_is_persisted() {
        let repo = MemoryRepository::new();
        let mut tracker = JobTracker::start(&repo, "upload.csv").unwrap();
        let id = tracker.id().to_string();
        assert_eq!(
            repo.get_job(&id).unwrap().unwrap().status,
            JobStatus::Started
        );

        tracker.record_batch(100, 98, 2).unwrap();
        let stored = repo.get_job(&id).unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Processing);
        assert_eq!(stored.records_processed, 100);

        assert_eq!(tracker.finish().unwrap(), JobStatus::CompletedWithErrors);
        let stored = repo.get_job(&id).unwrap().unwrap();
        assert!(stored.end_time.is_some());
        assert!(stored.duration_ms.is_some());
    }

    #[test]
    fn test_clean_run_completes() {
        let repo = MemoryRepository::new();
        let mut tracker = JobTracker::start(&repo, "upload.csv").unwrap();
        tracker.record_batch(10, 10, 0).unwrap();
        assert_eq!(tracker.finish().unwrap(), JobStatus::Completed);
    }

    #[test]
    fn test_terminal_state_rejects_changes() {
        let repo = MemoryRepository::new();
        let mut tracker = JobTracker::start(&repo, "upload.csv").unwrap();
        tracker.finish().unwrap();

        let err = tracker.record_batch(1, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidTransition {
                from: JobStatus::Completed,
                to: JobStatus::Processing,
                ..
            }
        ));
        assert!(tracker.fail("late").is_err());
    }

    #[test]
    fn test_fail_records_reason() {
        let repo = MemoryRepository::new();
        let mut tracker = JobTracker::start(&repo, "upload.csv").unwrap();
        tracker.fail("disk full").unwrap();

        let stored = repo.get_job(tracker.id()).unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.error_messages, vec!["disk full".to_string()]);
    }

    #[test]
    fn test_error_log_is_bounded() {
        let repo = MemoryRepository::new();
        let mut tracker = JobTracker::start(&repo, "upload.csv").unwrap();
        for i in 0..80 {
            tracker.add_error(format!("error {i}"));
        }
        assert_eq!(
            tracker.job().error_messages.len(),
            tabula_model::MAX_JOB_ERROR_MESSAGES
        );
    }
}
