//! Core types for the transform pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabula_model::{CanonicalField, CleanedRecord, PriceRange, QualityScores, RawValue};

use crate::normalization::DEFAULT_MAX_TEXT_LEN;

/// Default Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Switches and limits for [`transform`](crate::transform).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Reject non-positive prices and swap inverted price pairs.
    pub validate_prices: bool,
    /// Fill missing numeric fields with the mean and category with the mode.
    pub fill_missing: bool,
    /// Drop IQR outliers on prices and rating.
    pub remove_outliers: bool,
    /// Derive the price bucket and placeholder aggregates.
    pub calculate_features: bool,
    /// Collapse records sharing a product key.
    pub remove_duplicates: bool,
    /// Maximum length of cleaned free text, in characters.
    pub max_text_len: usize,
    /// Tukey fence multiplier for outlier bounds.
    pub iqr_multiplier: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            validate_prices: true,
            fill_missing: true,
            remove_outliers: true,
            calculate_features: true,
            remove_duplicates: true,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

/// A raw record projected onto canonical fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRecord {
    /// 0-based position among the input records.
    pub index: usize,
    pub fields: BTreeMap<CanonicalField, RawValue>,
    /// Source columns no canonical field claimed.
    pub extra: BTreeMap<String, RawValue>,
}

impl MappedRecord {
    /// Value of a canonical field; `Null` when unmapped.
    pub fn get(&self, field: CanonicalField) -> &RawValue {
        self.fields.get(&field).unwrap_or(&RawValue::Null)
    }
}

/// A cleaned record whose numeric fields may still be missing.
///
/// Produced by [`clean_records`](crate::clean_records) and refined by the
/// fill, outlier, and feature steps before
/// [`final_validation`](crate::final_validation) turns it into a
/// [`CleanedRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    /// 0-based position among the input records.
    pub index: usize,
    pub product_id: String,
    pub product_name: String,
    pub category: Option<String>,
    pub discounted_price: Option<f64>,
    pub actual_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<f64>,
    pub about: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_review: Option<String>,
    pub review_title: Option<String>,
    pub img_link: Option<String>,
    pub product_link: Option<String>,
    pub price_range: Option<PriceRange>,
    pub mean_rating: Option<f64>,
    pub product_count: Option<u64>,
    pub average_rating_count: Option<f64>,
    pub extra: BTreeMap<String, RawValue>,
}

impl PartialRecord {
    /// Current value of a numeric canonical field.
    pub fn numeric(&self, field: CanonicalField) -> Option<f64> {
        match field {
            CanonicalField::DiscountedPrice => self.discounted_price,
            CanonicalField::ActualPrice => self.actual_price,
            CanonicalField::DiscountPercentage => self.discount_percentage,
            CanonicalField::Rating => self.rating,
            CanonicalField::RatingCount => self.rating_count,
            _ => None,
        }
    }

    /// Mutable slot of a numeric canonical field.
    pub(crate) fn numeric_mut(&mut self, field: CanonicalField) -> Option<&mut Option<f64>> {
        match field {
            CanonicalField::DiscountedPrice => Some(&mut self.discounted_price),
            CanonicalField::ActualPrice => Some(&mut self.actual_price),
            CanonicalField::DiscountPercentage => Some(&mut self.discount_percentage),
            CanonicalField::Rating => Some(&mut self.rating),
            CanonicalField::RatingCount => Some(&mut self.rating_count),
            _ => None,
        }
    }

    /// Recomputes the discount when both prices are known.
    pub(crate) fn refresh_discount(&mut self) {
        if let (Some(discounted), Some(actual)) = (self.discounted_price, self.actual_price)
            && actual > 0.0
        {
            self.discount_percentage =
                Some(tabula_model::discount_percentage(discounted, actual));
        }
    }
}

/// Output of [`clean_records`](crate::clean_records).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanOutcome {
    pub records: Vec<PartialRecord>,
    /// One message per rejected row.
    pub errors: Vec<String>,
    /// Records whose prices were swapped.
    pub swapped: usize,
}

/// Output of [`remove_duplicates`](crate::remove_duplicates).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupResult {
    pub data: Vec<CleanedRecord>,
    pub duplicates_count: usize,
}

/// Counters for one transform call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformStatistics {
    pub input_records: usize,
    pub mapped_records: usize,
    /// Rows rejected while cleaning.
    pub rejected_records: usize,
    /// Individual field values filled.
    pub filled_values: usize,
    pub outliers_removed: usize,
    /// Records dropped by final validation.
    pub invalid_records: usize,
    pub duplicates_removed: usize,
    pub output_records: usize,
    pub quality: QualityScores,
}

/// Output of [`transform`](crate::transform).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformResult {
    pub data: Vec<CleanedRecord>,
    /// Row-level problems, one message per dropped row.
    pub errors: Vec<String>,
    /// One summary line per repair step that changed anything.
    pub warnings: Vec<String>,
    pub statistics: TransformStatistics,
}
