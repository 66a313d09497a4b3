//! Product catalog data ingestion.
//!
//! This crate turns an uploaded delimited-text file into loosely typed
//! records ready for transformation.
//!
//! # Features
//!
//! - **Extraction**: Read CSV-like input with delimiter probing, BOM handling
//!   and per-row error reporting
//! - **Column Detection**: Map source headers onto canonical catalog fields
//! - **Quality Pre-Report**: Summarize missing values, duplicates and column
//!   types before any cleaning
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabula_ingest::{ExtractOptions, data_quality_report, detect_column_mapping, extract_file};
//!
//! let extracted = extract_file(Path::new("amazon.csv"), &ExtractOptions::default())?;
//! let mapping = detect_column_mapping(&extracted.headers);
//! let report = data_quality_report(&extracted.records);
//! ```

mod csv;
mod error;
mod mapping;
mod quality;

// === Error Types ===
pub use error::{IngestError, Result};

// === Extraction ===
pub use csv::{
    CANDIDATE_DELIMITERS, DEFAULT_MAX_FILE_SIZE, ExtractOptions, ExtractResult,
    check_file_size_with_limit, detect_delimiter, extract, extract_file, normalize_headers,
};

// === Column Detection ===
pub use mapping::{ALIAS_TABLE_VERSION, COLUMN_ALIASES, aliases_for, detect_column_mapping};

// === Quality Pre-Report ===
pub use quality::data_quality_report;
