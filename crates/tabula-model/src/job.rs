//! Load-run tracking types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Upper bound on error messages retained per job and per load result.
pub const MAX_JOB_ERROR_MESSAGES: usize = 50;

/// Lifecycle status of an ETL job.
///
/// ```text
/// started ──► processing ──► completed
///    │            │     └──► completed_with_errors
///    └────────────┴────────► failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Started,
    Processing,
    Completed,
    CompletedWithErrors,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::CompletedWithErrors => "completed_with_errors",
            Self::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CompletedWithErrors | Self::Failed
        )
    }

    /// Returns true if the state machine allows moving to `next`.
    ///
    /// `processing → processing` is allowed so each batch can publish progress.
    /// A job with zero batches may finish straight from `started`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match self {
            Self::Started => next != Self::Started,
            Self::Processing => next != Self::Started,
            Self::Completed | Self::CompletedWithErrors | Self::Failed => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "started" => Ok(Self::Started),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "completed_with_errors" => Ok(Self::CompletedWithErrors),
            "failed" => Ok(Self::Failed),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// One pipeline load run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtlJob {
    pub id: String,
    pub file_name: String,
    pub status: JobStatus,
    pub records_processed: u64,
    pub records_success: u64,
    pub records_error: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    pub error_messages: Vec<String>,
}

impl EtlJob {
    /// Creates a job in the `started` state.
    pub fn new(id: impl Into<String>, file_name: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            status: JobStatus::Started,
            records_processed: 0,
            records_success: 0,
            records_error: 0,
            start_time,
            end_time: None,
            duration_ms: None,
            error_messages: Vec::new(),
        }
    }

    /// Appends an error message unless the bounded list is full.
    ///
    /// Returns false when the message was dropped.
    pub fn push_error(&mut self, message: impl Into<String>) -> bool {
        if self.error_messages.len() >= MAX_JOB_ERROR_MESSAGES {
            return false;
        }
        self.error_messages.push(message.into());
        true
    }
}

/// Outcome of a load call, consumed by the upload-handling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    pub job_id: String,
    pub status: JobStatus,
    pub total_records: u64,
    pub records_success: u64,
    pub records_error: u64,
    pub records_skipped: u64,
    pub batches: usize,
    pub duration_ms: u64,
    /// Bounded sample of error messages.
    pub errors: Vec<String>,
    pub success: bool,
}
