//! Store contents shared by the in-memory and file-backed stores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabula_model::{CategoryAggregate, CategoryInsight, CleanedRecord, EtlJob, TrendAnalysis};

use crate::error::{Result, StoreError};

/// Everything a store holds. Serialized as the file store's payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreState {
    pub products: BTreeMap<String, CleanedRecord>,
    pub jobs: BTreeMap<String, EtlJob>,
    pub insights: BTreeMap<String, CategoryInsight>,
    pub trends: Vec<TrendAnalysis>,
}

impl StoreState {
    pub fn upsert_product(&mut self, record: &CleanedRecord) {
        self.products
            .insert(record.product_id.clone(), record.clone());
    }

    pub fn insert_product(&mut self, record: &CleanedRecord) -> Result<()> {
        if self.products.contains_key(&record.product_id) {
            return Err(StoreError::Duplicate {
                key: record.product_id.clone(),
            });
        }
        self.upsert_product(record);
        Ok(())
    }

    pub fn create_job(&mut self, job: &EtlJob) -> Result<()> {
        if self.jobs.contains_key(&job.id) {
            return Err(StoreError::Duplicate {
                key: job.id.clone(),
            });
        }
        self.jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    pub fn update_job(&mut self, job: &EtlJob) -> Result<()> {
        let Some(slot) = self.jobs.get_mut(&job.id) else {
            return Err(StoreError::NotFound {
                entity: "job",
                key: job.id.clone(),
            });
        };
        *slot = job.clone();
        Ok(())
    }

    pub fn recent_jobs(&self, limit: usize) -> Vec<EtlJob> {
        let mut jobs: Vec<EtlJob> = self.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.start_time.cmp(&a.start_time).then_with(|| a.id.cmp(&b.id)));
        jobs.truncate(limit);
        jobs
    }

    pub fn delete_jobs_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.jobs.len();
        self.jobs
            .retain(|_, job| !(job.status.is_terminal() && job.start_time < cutoff));
        before - self.jobs.len()
    }

    pub fn upsert_category_insight(&mut self, insight: &CategoryInsight) {
        self.insights
            .insert(insight.category.clone(), insight.clone());
    }

    pub fn delete_trends_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.trends.len();
        self.trends.retain(|trend| trend.created_at >= cutoff);
        before - self.trends.len()
    }

    pub fn aggregate_by_category(&self) -> Vec<CategoryAggregate> {
        aggregate_products(self.products.values())
    }
}

#[derive(Default)]
struct Accumulator<'a> {
    count: u64,
    rating_sum: f64,
    price_sum: f64,
    discount_sum: f64,
    top: Option<&'a CleanedRecord>,
}

/// Groups products by category and averages rating, price, and discount.
///
/// The top-rated product is the highest rating, then the highest rating
/// count, then the first in iteration order.
pub fn aggregate_products<'a>(
    products: impl IntoIterator<Item = &'a CleanedRecord>,
) -> Vec<CategoryAggregate> {
    let mut groups: BTreeMap<&str, Accumulator<'a>> = BTreeMap::new();

    for product in products {
        let acc = groups.entry(product.category.as_str()).or_default();
        acc.count += 1;
        acc.rating_sum += product.rating;
        acc.price_sum += product.discounted_price;
        acc.discount_sum += product.discount_percentage;
        let better = acc.top.is_none_or(|top| {
            product.rating > top.rating
                || (product.rating == top.rating && product.rating_count > top.rating_count)
        });
        if better {
            acc.top = Some(product);
        }
    }

    groups
        .into_iter()
        .map(|(category, acc)| {
            let n = acc.count as f64;
            CategoryAggregate {
                category: category.to_string(),
                total_products: acc.count,
                average_rating: acc.rating_sum / n,
                average_price: acc.price_sum / n,
                average_discount: acc.discount_sum / n,
                top_rated_product: acc.top.map(|p| p.product_name.clone()),
            }
        })
        .collect()
}
