//! Quality scores comparing the input size with the cleaned output.

use std::collections::BTreeSet;

use tabula_model::{CleanedRecord, QualityScores};

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)
}

/// Scores the cleaned output, each in `[0, 100]`.
///
/// - completeness: share of the original records that survived
/// - accuracy: share of cleaned records with valid prices, rating, and discount
/// - consistency: share with a non-empty name and category
/// - uniqueness: distinct product ids over cleaned records
///
/// Zero denominators score 0. `overall` is the mean of the four.
pub fn quality_report(original_len: usize, cleaned: &[CleanedRecord]) -> QualityScores {
    let total = cleaned.len();
    let accurate = cleaned
        .iter()
        .filter(|r| r.has_valid_prices() && r.has_valid_rating() && r.has_valid_discount())
        .count();
    let consistent = cleaned.iter().filter(|r| r.has_identity()).count();
    let distinct_ids: BTreeSet<&str> = cleaned.iter().map(|r| r.product_id.as_str()).collect();

    let completeness = percentage(total, original_len);
    let accuracy = percentage(accurate, total);
    let consistency = percentage(consistent, total);
    let uniqueness = percentage(distinct_ids.len(), total);

    QualityScores {
        completeness,
        accuracy,
        consistency,
        uniqueness,
        overall: (completeness + accuracy + consistency + uniqueness) / 4.0,
    }
}
