//! Data-quality pre-report over extracted records.

use std::collections::{BTreeMap, BTreeSet};

use tabula_model::{
    ColumnStats, ColumnType, DataQualityReport, RawRecord, RawValue, parse_numeric,
};

/// Share of non-missing values that must be numeric for a numeric column.
const NUMERIC_RATIO_MIN: f64 = 0.8;
/// Unique-value share of the row count below which a column is categorical.
const CATEGORICAL_RATIO_MAX: f64 = 0.1;
/// Headers treated as the row identifier for duplicate counting.
const ID_HEADERS: [&str; 2] = ["product_id", "productId"];

/// Builds the pre-report.
///
/// Duplicates are counted only through an id-like header (`product_id` or
/// `productId`); without one the count is 0. Rows sharing everything but an
/// id column are not detected.
pub fn data_quality_report(records: &[RawRecord]) -> DataQualityReport {
    let total = records.len();
    let headers: BTreeSet<&String> = records.iter().flat_map(|r| r.iter().map(|(h, _)| h)).collect();

    let mut report = DataQualityReport {
        total_records: total,
        ..DataQualityReport::default()
    };

    for header in headers {
        let values: Vec<Option<&RawValue>> = records.iter().map(|r| r.get(header)).collect();
        let missing = values
            .iter()
            .filter(|v| v.is_none_or(RawValue::is_missing))
            .count();
        report.missing_values.insert(header.clone(), missing);
        report
            .column_stats
            .insert(header.clone(), analyze_column(&values, total));
    }

    report.duplicate_records = count_duplicates(records);
    report.empty_records = records.iter().filter(|r| r.is_blank()).count();

    tracing::debug!(
        records = total,
        duplicates = report.duplicate_records,
        empty = report.empty_records,
        "Built data quality report"
    );
    report
}

/// Numeric value of a cell, accepting text such as "1,299".
fn numeric_value(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(v) => Some(*v),
        RawValue::Text(s) => parse_numeric(s),
        RawValue::Null => None,
    }
}

fn analyze_column(values: &[Option<&RawValue>], total: usize) -> ColumnStats {
    let present: Vec<&RawValue> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_missing())
        .collect();

    let unique: BTreeSet<String> = present
        .iter()
        .map(|v| v.to_display_string().trim().to_string())
        .collect();
    let numbers: Vec<f64> = present.iter().filter_map(|v| numeric_value(v)).collect();

    let is_numeric =
        !present.is_empty() && numbers.len() as f64 / present.len() as f64 >= NUMERIC_RATIO_MIN;

    if is_numeric {
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
        return ColumnStats {
            column_type: ColumnType::Numeric,
            unique_count: unique.len(),
            min: Some(min),
            max: Some(max),
            mean: Some(mean),
        };
    }

    let column_type = if (unique.len() as f64) < total as f64 * CATEGORICAL_RATIO_MAX {
        ColumnType::Categorical
    } else {
        ColumnType::Text
    };
    ColumnStats {
        column_type,
        unique_count: unique.len(),
        min: None,
        max: None,
        mean: None,
    }
}

fn count_duplicates(records: &[RawRecord]) -> usize {
    let Some(id_header) = ID_HEADERS
        .iter()
        .find(|h| records.iter().any(|r| r.get(h).is_some()))
    else {
        return 0;
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let Some(value) = record.get(id_header).filter(|v| !v.is_missing()) else {
            continue;
        };
        *counts
            .entry(value.to_display_string().trim().to_string())
            .or_insert(0) += 1;
    }
    counts.values().map(|c| c - 1).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[(&str, &str)]) -> RawRecord {
        cells
            .iter()
            .map(|(h, v)| (*h, RawValue::from_cell(v)))
            .collect()
    }

    #[test]
    fn test_missing_and_empty_counts() {
        let records = vec![
            record(&[("name", "Cable"), ("price", "10")]),
            record(&[("name", ""), ("price", "")]),
            record(&[("name", "Lamp"), ("price", "")]),
        ];
        let report = data_quality_report(&records);
        assert_eq!(report.total_records, 3);
        assert_eq!(report.missing_values["name"], 1);
        assert_eq!(report.missing_values["price"], 2);
        assert_eq!(report.empty_records, 1);
    }

    #[test]
    fn test_numeric_column_stats() {
        let records = vec![
            record(&[("price", "10")]),
            record(&[("price", "1,000")]),
            record(&[("price", "40")]),
            record(&[("price", "20")]),
            record(&[("price", "n/a")]),
        ];
        let stats = &data_quality_report(&records).column_stats["price"];
        assert_eq!(stats.column_type, ColumnType::Numeric);
        assert_eq!(stats.min, Some(10.0));
        assert_eq!(stats.max, Some(1000.0));
        assert_eq!(stats.mean, Some(267.5));
    }

    #[test]
    fn test_categorical_vs_text() {
        let mut records = Vec::new();
        for i in 0..40 {
            let category = if i % 2 == 0 { "Electronics" } else { "Home" };
            let name = format!("Item {i}");
            records.push(record(&[("category", category), ("name", name.as_str())]));
        }
        let report = data_quality_report(&records);
        assert_eq!(
            report.column_stats["category"].column_type,
            ColumnType::Categorical
        );
        assert_eq!(report.column_stats["name"].column_type, ColumnType::Text);
        assert_eq!(report.column_stats["name"].unique_count, 40);
    }

    #[test]
    fn test_duplicates_via_id_column() {
        let records = vec![
            record(&[("product_id", "A"), ("name", "x")]),
            record(&[("product_id", "A"), ("name", "y")]),
            record(&[("product_id", "A"), ("name", "z")]),
            record(&[("product_id", "B"), ("name", "x")]),
        ];
        assert_eq!(data_quality_report(&records).duplicate_records, 2);
    }

    #[test]
    fn test_duplicates_without_id_column_are_zero() {
        let records = vec![
            record(&[("name", "x")]),
            record(&[("name", "x")]),
        ];
        assert_eq!(data_quality_report(&records).duplicate_records, 0);
    }
}
