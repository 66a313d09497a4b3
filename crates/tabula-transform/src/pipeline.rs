//! The full transform, composed step by step.

use tabula_model::{ColumnMapping, RawRecord};

use crate::clean::clean_records;
use crate::dedupe::remove_duplicates;
use crate::features::calculate_features;
use crate::fill::fill_missing_values;
use crate::mapping::apply_mapping;
use crate::outliers::remove_outliers;
use crate::quality::quality_report;
use crate::types::{TransformOptions, TransformResult, TransformStatistics};
use crate::validate::final_validation;

/// Runs mapping, cleaning, fill, outlier removal, features, final validation
/// and deduplication in that order.
///
/// Every row-level problem ends up in `errors` and the run continues. A
/// mapping without a `productName` column rejects every row.
pub fn transform(
    raw: &[RawRecord],
    mapping: &ColumnMapping,
    options: &TransformOptions,
) -> TransformResult {
    tracing::info!(records = raw.len(), "Transforming records");

    let mut statistics = TransformStatistics {
        input_records: raw.len(),
        ..TransformStatistics::default()
    };
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // 1. Mapping
    let mapped = apply_mapping(raw, mapping);
    statistics.mapped_records = mapped.len();

    // 2. Clean
    let cleaned = clean_records(&mapped, options);
    statistics.rejected_records = cleaned.errors.len();
    errors.extend(cleaned.errors);
    if cleaned.swapped > 0 {
        warnings.push(format!(
            "Swapped discounted and actual price on {} records",
            cleaned.swapped
        ));
    }
    let mut records = cleaned.records;

    // 3. Fill
    if options.fill_missing {
        let (filled, count) = fill_missing_values(records);
        records = filled;
        statistics.filled_values = count;
        if count > 0 {
            warnings.push(format!("Filled {count} missing values"));
        }
    }

    // 4. Outliers
    if options.remove_outliers {
        let (kept, removed) = remove_outliers(records, options.iqr_multiplier);
        records = kept;
        statistics.outliers_removed = removed;
        if removed > 0 {
            warnings.push(format!("Removed {removed} outlier records"));
        }
    }

    // 5. Features
    if options.calculate_features {
        records = calculate_features(records);
    }

    // 6. Final validation
    let (mut data, rejected) = final_validation(records);
    statistics.invalid_records = rejected.len();
    errors.extend(rejected);

    if options.remove_duplicates {
        let deduped = remove_duplicates(data);
        data = deduped.data;
        statistics.duplicates_removed = deduped.duplicates_count;
        if deduped.duplicates_count > 0 {
            warnings.push(format!(
                "Removed {} duplicate records",
                deduped.duplicates_count
            ));
        }
    }

    statistics.output_records = data.len();
    statistics.quality = quality_report(raw.len(), &data);

    if !warnings.is_empty() {
        tracing::warn!(warnings = warnings.len(), "Transform applied repairs");
    }
    tracing::info!(
        input = statistics.input_records,
        output = statistics.output_records,
        errors = errors.len(),
        quality = statistics.quality.overall,
        "Transform complete"
    );

    TransformResult {
        data,
        errors,
        warnings,
        statistics,
    }
}
