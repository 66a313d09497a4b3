//! Cleaned product records and derived price buckets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::value::RawValue;

/// Categorical bucket derived from the discounted price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    Low,
    Medium,
    High,
    Premium,
}

impl PriceRange {
    /// All buckets in ascending order.
    pub const ALL: [PriceRange; 4] = [Self::Low, Self::Medium, Self::High, Self::Premium];

    /// Buckets a discounted price: `<500` Low, `<1000` Medium, `<5000` High, else Premium.
    pub fn from_price(price: f64) -> Self {
        if price < 500.0 {
            Self::Low
        } else if price < 1000.0 {
            Self::Medium
        } else if price < 5000.0 {
            Self::High
        } else {
            Self::Premium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceRange {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownPriceRange(s.to_string()))
    }
}

/// Default category for rows that have none.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// The canonical, validated representation of one product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedRecord {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub discounted_price: f64,
    pub actual_price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub rating_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_link: Option<String>,
    /// Derived bucket; `None` when feature calculation is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    /// Placeholder aggregates, overwritten by later category aggregation.
    pub mean_rating: f64,
    pub product_count: u64,
    pub average_rating_count: f64,
    /// Unmapped source columns, carried through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, RawValue>,
}

impl CleanedRecord {
    /// Creates a record with the required fields; optional fields empty.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        category: impl Into<String>,
        discounted_price: f64,
        actual_price: f64,
        rating: f64,
        rating_count: u64,
    ) -> Self {
        let mut record = Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            category: category.into(),
            discounted_price,
            actual_price,
            discount_percentage: 0.0,
            rating,
            rating_count,
            about: None,
            user_id: None,
            user_name: None,
            user_review: None,
            review_title: None,
            img_link: None,
            product_link: None,
            price_range: None,
            mean_rating: rating,
            product_count: 1,
            average_rating_count: rating_count as f64,
            extra: BTreeMap::new(),
        };
        record.discount_percentage = discount_percentage(discounted_price, actual_price);
        record
    }

    /// True when both prices are positive and correctly ordered.
    pub fn has_valid_prices(&self) -> bool {
        self.discounted_price > 0.0
            && self.actual_price > 0.0
            && self.discounted_price <= self.actual_price
    }

    /// True when the rating lies in `[0, 5]`.
    pub fn has_valid_rating(&self) -> bool {
        (0.0..=5.0).contains(&self.rating)
    }

    /// True when the discount lies in `[0, 100]`.
    pub fn has_valid_discount(&self) -> bool {
        (0.0..=100.0).contains(&self.discount_percentage)
    }

    /// True when name and category are non-empty.
    pub fn has_identity(&self) -> bool {
        !self.product_name.trim().is_empty() && !self.category.trim().is_empty()
    }

    /// All persisted-record invariants.
    pub fn is_valid(&self) -> bool {
        self.has_identity() && self.has_valid_prices() && self.has_valid_rating()
    }
}

/// `(actual - discounted) / actual * 100`, rounded to the nearest integer.
///
/// Returns 0 when the actual price is not positive.
pub fn discount_percentage(discounted: f64, actual: f64) -> f64 {
    if actual <= 0.0 {
        return 0.0;
    }
    (((actual - discounted) / actual) * 100.0).round()
}
