//! Aggregate tables derived from the persisted products.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Group-by result for one category, computed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub category: String,
    pub total_products: u64,
    pub average_rating: f64,
    pub average_price: f64,
    pub average_discount: f64,
    /// Name of the highest-rated product, ties broken by rating count.
    pub top_rated_product: Option<String>,
}

/// Per-category statistics, recomputed after every successful load.
///
/// Always reconstructible from the product rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInsight {
    pub category: String,
    pub total_products: u64,
    pub average_rating: f64,
    pub average_price: f64,
    pub average_discount: f64,
    pub top_rated_product: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryInsight {
    pub fn from_aggregate(aggregate: CategoryAggregate, updated_at: DateTime<Utc>) -> Self {
        Self {
            category: aggregate.category,
            total_products: aggregate.total_products,
            average_rating: aggregate.average_rating,
            average_price: aggregate.average_price,
            average_discount: aggregate.average_discount,
            top_rated_product: aggregate.top_rated_product,
            updated_at,
        }
    }
}

/// Dated histogram snapshot appended after each load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub id: String,
    pub date: NaiveDate,
    pub total_products: u64,
    pub price_range_distribution: BTreeMap<String, u64>,
    pub category_distribution: BTreeMap<String, u64>,
    pub created_at: DateTime<Utc>,
}
