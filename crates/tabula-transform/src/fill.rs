//! Missing-value imputation.

use std::collections::BTreeMap;

use tabula_model::{CanonicalField, UNKNOWN_CATEGORY};

use crate::types::PartialRecord;

/// Fills missing numeric fields and categories.
///
/// Numeric canonical fields take the mean over the records that have a
/// value; `category` takes the most frequent value, the lexicographically
/// smallest on ties. A field with no values at all falls back to 0 or
/// `"Unknown"`. Discounts are recomputed for records whose prices changed.
///
/// Returns the records and the number of individual values filled.
pub fn fill_missing_values(mut records: Vec<PartialRecord>) -> (Vec<PartialRecord>, usize) {
    let mut filled = 0;

    for field in CanonicalField::NUMERIC {
        let present: Vec<f64> = records.iter().filter_map(|r| r.numeric(field)).collect();
        let fill_value = mean(&present).unwrap_or(0.0);

        for record in &mut records {
            if let Some(slot) = record.numeric_mut(field)
                && slot.is_none()
            {
                *slot = Some(fill_value);
                filled += 1;
            }
        }
    }

    let category = mode(records.iter().filter_map(|r| r.category.as_deref()))
        .unwrap_or(UNKNOWN_CATEGORY)
        .to_string();
    for record in &mut records {
        if record.category.is_none() {
            record.category = Some(category.clone());
            filled += 1;
        }
    }

    for record in &mut records {
        record.refresh_discount();
    }

    tracing::debug!(filled, records = records.len(), "Filled missing values");
    (records, filled)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Most frequent value; ties go to the lexicographically smallest.
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    // Ascending key order, so `>` keeps the first (smallest) of equal counts
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
