//! Report and score types produced by the pipeline stages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A row that could not be turned into a `RawRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// 1-based line number in the input, header included.
    pub row: usize,
    pub message: String,
}

/// Inferred column type used by the data-quality pre-report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Text => "text",
        }
    }
}

/// Per-column statistics; min/max/mean only for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub column_type: ColumnType,
    pub unique_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
}

/// Data-quality pre-report over the extracted records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityReport {
    pub total_records: usize,
    pub missing_values: BTreeMap<String, usize>,
    pub duplicate_records: usize,
    pub empty_records: usize,
    pub column_stats: BTreeMap<String, ColumnStats>,
}

/// Quality scores in `[0, 100]` comparing original and cleaned data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub completeness: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub uniqueness: f64,
    pub overall: f64,
}

/// Post-hoc consistency sweep over the persisted products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub total_products: u64,
    pub invalid_prices: u64,
    pub invalid_ratings: u64,
    pub duplicate_ids: u64,
    pub issues: Vec<String>,
    pub is_valid: bool,
}
