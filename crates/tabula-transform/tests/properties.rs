//! Property-based tests for the transform invariants using proptest.

use proptest::prelude::*;

use tabula_model::{CanonicalField, ColumnMapping, RawRecord, RawValue};
use tabula_transform::{TransformOptions, quality_report, transform};

fn mapping() -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    mapping.assign(CanonicalField::ProductId, "id");
    mapping.assign(CanonicalField::ProductName, "name");
    mapping.assign(CanonicalField::Category, "category");
    mapping.assign(CanonicalField::DiscountedPrice, "discounted");
    mapping.assign(CanonicalField::ActualPrice, "actual");
    mapping.assign(CanonicalField::Rating, "rating");
    mapping
}

fn cell(value: Option<f64>) -> RawValue {
    value.map_or(RawValue::Null, RawValue::Number)
}

prop_compose! {
    fn raw_row()(
        id in 0u8..20,
        name in prop::option::weighted(0.9, "[A-Za-z ]{1,12}"),
        category in prop::option::of(prop::sample::select(vec!["Home", "Audio", "Office"])),
        discounted in prop::option::weighted(0.9, -50.0f64..20_000.0),
        actual in prop::option::weighted(0.9, -50.0f64..20_000.0),
        rating in prop::option::weighted(0.9, -3.0f64..9.0),
    ) -> RawRecord {
        [
            ("id", RawValue::Text(format!("P{id}"))),
            ("name", name.map_or(RawValue::Null, RawValue::Text)),
            ("category", category.map_or(RawValue::Null, RawValue::from)),
            ("discounted", cell(discounted)),
            ("actual", cell(actual)),
            ("rating", cell(rating)),
        ]
        .into_iter()
        .collect()
    }
}

proptest! {
    #[test]
    fn output_satisfies_price_invariant(rows in prop::collection::vec(raw_row(), 0..40)) {
        let result = transform(&rows, &mapping(), &TransformOptions::default());
        for record in &result.data {
            prop_assert!(record.discounted_price <= record.actual_price);
            let expected =
                ((record.actual_price - record.discounted_price) / record.actual_price * 100.0).round();
            prop_assert!((record.discount_percentage - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn output_rating_is_bounded(rows in prop::collection::vec(raw_row(), 0..40)) {
        let result = transform(&rows, &mapping(), &TransformOptions::default());
        for record in &result.data {
            prop_assert!((0.0..=5.0).contains(&record.rating));
            prop_assert!(!record.product_name.is_empty());
            prop_assert!(!record.category.is_empty());
        }
    }

    #[test]
    fn outlier_removal_never_adds_records(rows in prop::collection::vec(raw_row(), 0..40)) {
        let with = transform(&rows, &mapping(), &TransformOptions::default());
        let without_options = TransformOptions {
            remove_outliers: false,
            ..TransformOptions::default()
        };
        let without = transform(&rows, &mapping(), &without_options);
        prop_assert!(with.data.len() <= without.data.len());
    }

    #[test]
    fn quality_scores_are_bounded(rows in prop::collection::vec(raw_row(), 0..40)) {
        let result = transform(&rows, &mapping(), &TransformOptions::default());
        let scores = quality_report(rows.len(), &result.data);
        for score in [
            scores.completeness,
            scores.accuracy,
            scores.consistency,
            scores.uniqueness,
            scores.overall,
        ] {
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn output_ids_are_unique(rows in prop::collection::vec(raw_row(), 0..40)) {
        let result = transform(&rows, &mapping(), &TransformOptions::default());
        let mut ids: Vec<&str> = result.data.iter().map(|r| r.product_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), result.data.len());
    }
}
