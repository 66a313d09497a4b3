//! Category insight and trend snapshot regeneration.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tabula_model::{CategoryInsight, CleanedRecord, PriceRange, TrendAnalysis};
use tabula_store::Repository;
use uuid::Uuid;

use crate::error::Result;

/// What one regeneration wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightSummary {
    pub categories: usize,
    pub trend: TrendAnalysis,
}

/// Builds a dated histogram snapshot over the given products.
///
/// Every price bucket appears in the distribution, zero counts included.
/// Products without a stored bucket are bucketed by discounted price.
pub fn build_trend_snapshot(products: &[CleanedRecord], now: DateTime<Utc>) -> TrendAnalysis {
    let mut price_range_distribution: BTreeMap<String, u64> = PriceRange::ALL
        .iter()
        .map(|range| (range.as_str().to_string(), 0))
        .collect();
    let mut category_distribution: BTreeMap<String, u64> = BTreeMap::new();

    for product in products {
        let range = product
            .price_range
            .unwrap_or_else(|| PriceRange::from_price(product.discounted_price));
        *price_range_distribution
            .entry(range.as_str().to_string())
            .or_insert(0) += 1;
        *category_distribution
            .entry(product.category.clone())
            .or_insert(0) += 1;
    }

    TrendAnalysis {
        id: Uuid::new_v4().to_string(),
        date: now.date_naive(),
        total_products: products.len() as u64,
        price_range_distribution,
        category_distribution,
        created_at: now,
    }
}

/// Recomputes every category insight and appends a trend snapshot.
///
/// Both are full recomputations over all stored products, not just the
/// last load.
pub fn regenerate_insights<R: Repository + ?Sized>(repo: &R) -> Result<InsightSummary> {
    let now = Utc::now();

    let aggregates = repo.aggregate_by_category()?;
    let categories = aggregates.len();
    for aggregate in aggregates {
        repo.upsert_category_insight(&CategoryInsight::from_aggregate(aggregate, now))?;
    }

    let products = repo.all_products()?;
    let trend = build_trend_snapshot(&products, now);
    repo.append_trend(&trend)?;

    tracing::info!(
        categories,
        products = trend.total_products,
        "Regenerated insights"
    );
    Ok(InsightSummary { categories, trend })
}
