//! Product record transformation.
//!
//! Turns extracted raw records into validated [`CleanedRecord`]s ready for
//! loading.
//!
//! # Overview
//!
//! Every step is a public function over a list of records, and
//! [`transform`] composes them in a fixed order:
//!
//! 1. [`apply_mapping`]: project raw rows onto canonical fields
//! 2. [`clean_records`]: normalize text, coerce numbers, repair prices
//! 3. [`fill_missing_values`]: mean/mode imputation
//! 4. [`remove_outliers`]: Tukey IQR screening on prices and rating
//! 5. [`calculate_features`]: price bucket and placeholder aggregates
//! 6. [`final_validation`]: enforce the persisted-record invariants
//! 7. [`remove_duplicates`]: one record per product key
//!
//! # Example
//!
//! ```ignore
//! use tabula_transform::{TransformOptions, transform};
//!
//! let result = transform(&extracted.records, &mapping, &TransformOptions::default());
//! println!("{} clean records, {} rejected", result.data.len(), result.errors.len());
//! ```
//!
//! [`CleanedRecord`]: tabula_model::CleanedRecord

mod clean;
mod dedupe;
mod features;
mod fill;
mod mapping;
mod outliers;
mod pipeline;
mod quality;
mod types;
mod validate;

pub mod normalization;

// Core types
pub use types::{
    CleanOutcome, DEFAULT_IQR_MULTIPLIER, DedupResult, MappedRecord, PartialRecord,
    TransformOptions, TransformResult, TransformStatistics,
};

// Steps
pub use clean::clean_records;
pub use dedupe::{product_key, remove_duplicates};
pub use features::calculate_features;
pub use fill::fill_missing_values;
pub use mapping::apply_mapping;
pub use outliers::{IqrBounds, OUTLIER_FIELDS, remove_outliers};
pub use validate::final_validation;

// Pipeline
pub use pipeline::transform;
pub use quality::quality_report;
