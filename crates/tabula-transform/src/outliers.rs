//! Tukey IQR outlier removal.

use std::collections::BTreeSet;

use tabula_model::CanonicalField;

use crate::types::PartialRecord;

/// Fields screened for outliers.
pub const OUTLIER_FIELDS: [CanonicalField; 3] = [
    CanonicalField::DiscountedPrice,
    CanonicalField::ActualPrice,
    CanonicalField::Rating,
];

/// Fewest values needed before quartiles are meaningful.
const MIN_RECORDS: usize = 4;

/// Inclusive bounds `[Q1 - k·IQR, Q3 + k·IQR]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Computes bounds over the values, or `None` with fewer than four.
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        if values.len() < MIN_RECORDS {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        Some(Self {
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Quantile of sorted data by linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Drops records outside the IQR bounds of any screened field.
///
/// Bounds are computed per field over all records that have a value; a
/// record is removed when any one of its fields falls outside. Inputs with
/// fewer than four records are returned unchanged.
///
/// Returns the surviving records and the number removed.
pub fn remove_outliers(
    records: Vec<PartialRecord>,
    multiplier: f64,
) -> (Vec<PartialRecord>, usize) {
    if records.len() < MIN_RECORDS {
        return (records, 0);
    }

    let mut outliers = BTreeSet::new();
    for field in OUTLIER_FIELDS {
        let values: Vec<f64> = records.iter().filter_map(|r| r.numeric(field)).collect();
        let Some(bounds) = IqrBounds::from_values(&values, multiplier) else {
            continue;
        };
        tracing::debug!(
            field = %field,
            lower = bounds.lower,
            upper = bounds.upper,
            "Computed IQR bounds"
        );
        for (idx, record) in records.iter().enumerate() {
            if record.numeric(field).is_some_and(|v| !bounds.contains(v)) {
                outliers.insert(idx);
            }
        }
    }

    let removed = outliers.len();
    let kept = records
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !outliers.contains(idx))
        .map(|(_, record)| record)
        .collect();
    (kept, removed)
}
