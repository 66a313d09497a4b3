//! The storage contract the loader depends on.

use chrono::{DateTime, Utc};
use tabula_model::{CategoryAggregate, CategoryInsight, CleanedRecord, EtlJob, TrendAnalysis};

use crate::error::Result;

/// Persistent store for products, jobs, and derived insights.
///
/// Every method takes `&self`; implementations guard their state internally
/// and each call is atomic on its own. Nothing spans calls except the batch
/// bracket, which lets file-backed stores flush once per batch.
pub trait Repository: Send + Sync {
    // === Products ===

    /// Inserts or replaces the product with the same `product_id`.
    fn upsert_product(&self, record: &CleanedRecord) -> Result<()>;

    /// Inserts a new product; [`StoreError::Duplicate`] if the id exists.
    ///
    /// [`StoreError::Duplicate`]: crate::StoreError::Duplicate
    fn insert_product(&self, record: &CleanedRecord) -> Result<()>;

    fn get_product(&self, product_id: &str) -> Result<Option<CleanedRecord>>;

    /// All products ordered by id.
    fn all_products(&self) -> Result<Vec<CleanedRecord>>;

    fn product_count(&self) -> Result<u64>;

    /// Starts a group of product writes.
    fn begin_batch(&self) -> Result<()>;

    /// Ends a group of product writes, persisting them.
    fn commit_batch(&self) -> Result<()>;

    /// Per-category aggregates over every stored product, ordered by category.
    fn aggregate_by_category(&self) -> Result<Vec<CategoryAggregate>>;

    // === Jobs ===

    fn create_job(&self, job: &EtlJob) -> Result<()>;

    /// Replaces a stored job; [`StoreError::NotFound`] if it was never created.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    fn update_job(&self, job: &EtlJob) -> Result<()>;

    fn get_job(&self, id: &str) -> Result<Option<EtlJob>>;

    /// Up to `limit` jobs, newest start time first.
    fn recent_jobs(&self, limit: usize) -> Result<Vec<EtlJob>>;

    /// Deletes terminal jobs that started before `cutoff`; returns the count.
    fn delete_jobs_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    // === Insights ===

    fn upsert_category_insight(&self, insight: &CategoryInsight) -> Result<()>;

    /// All category insights ordered by category.
    fn category_insights(&self) -> Result<Vec<CategoryInsight>>;

    fn append_trend(&self, trend: &TrendAnalysis) -> Result<()>;

    /// Trend snapshots in creation order.
    fn trends(&self) -> Result<Vec<TrendAnalysis>>;

    /// Deletes snapshots created before `cutoff`; returns the count.
    fn delete_trends_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
