//! Data model types for the tabula product ETL pipeline.
//!
//! This crate provides the types every pipeline stage exchanges:
//! - **Raw input**: loosely typed cells and rows produced by extraction
//! - **Canonical schema**: the fixed set of product fields and the header mapping
//! - **Cleaned records**: validated product rows ready for loading
//! - **Jobs**: load-run tracking and its status state machine
//! - **Insights**: per-category aggregates and dated trend snapshots
//! - **Reports**: data-quality, transform, and integrity summaries
//!
//! # Module Organization
//!
//! - [`value`]: `RawValue` and `RawRecord`
//! - [`field`]: `CanonicalField` and `ColumnMapping`
//! - [`record`]: `CleanedRecord` and `PriceRange`
//! - [`job`]: `EtlJob`, `JobStatus`, `LoadResult`
//! - [`insight`]: `CategoryInsight`, `CategoryAggregate`, `TrendAnalysis`
//! - [`report`]: report and score types shared by the stages
//! - [`numeric`]: lenient numeric parsing and formatting helpers

pub mod error;
pub mod field;
pub mod insight;
pub mod job;
pub mod numeric;
pub mod record;
pub mod report;
pub mod value;

pub use error::ModelError;
pub use field::{CanonicalField, ColumnMapping};
pub use insight::{CategoryAggregate, CategoryInsight, TrendAnalysis};
pub use job::{EtlJob, JobStatus, LoadResult, MAX_JOB_ERROR_MESSAGES};
pub use numeric::{format_numeric, parse_numeric};
pub use record::{CleanedRecord, PriceRange, UNKNOWN_CATEGORY, discount_percentage};
pub use report::{
    ColumnStats, ColumnType, DataQualityReport, IntegrityReport, ParseIssue, QualityScores,
};
pub use value::{RawRecord, RawValue};
