//! In-memory repository.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tabula_model::{CategoryAggregate, CategoryInsight, CleanedRecord, EtlJob, TrendAnalysis};

use crate::error::Result;
use crate::repository::Repository;
use crate::state::StoreState;

/// Repository backed by `RwLock`-guarded maps. Contents die with the value.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<StoreState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn upsert_product(&self, record: &CleanedRecord) -> Result<()> {
        self.state.write()?.upsert_product(record);
        Ok(())
    }

    fn insert_product(&self, record: &CleanedRecord) -> Result<()> {
        self.state.write()?.insert_product(record)
    }

    fn get_product(&self, product_id: &str) -> Result<Option<CleanedRecord>> {
        Ok(self.state.read()?.products.get(product_id).cloned())
    }

    fn all_products(&self) -> Result<Vec<CleanedRecord>> {
        Ok(self.state.read()?.products.values().cloned().collect())
    }

    fn product_count(&self) -> Result<u64> {
        Ok(self.state.read()?.products.len() as u64)
    }

    fn begin_batch(&self) -> Result<()> {
        Ok(())
    }

    fn commit_batch(&self) -> Result<()> {
        Ok(())
    }

    fn aggregate_by_category(&self) -> Result<Vec<CategoryAggregate>> {
        Ok(self.state.read()?.aggregate_by_category())
    }

    fn create_job(&self, job: &EtlJob) -> Result<()> {
        self.state.write()?.create_job(job)
    }

    fn update_job(&self, job: &EtlJob) -> Result<()> {
        self.state.write()?.update_job(job)
    }

    fn get_job(&self, id: &str) -> Result<Option<EtlJob>> {
        Ok(self.state.read()?.jobs.get(id).cloned())
    }

    fn recent_jobs(&self, limit: usize) -> Result<Vec<EtlJob>> {
        Ok(self.state.read()?.recent_jobs(limit))
    }

    fn delete_jobs_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        Ok(self.state.write()?.delete_jobs_before(cutoff))
    }

    fn upsert_category_insight(&self, insight: &CategoryInsight) -> Result<()> {
        self.state.write()?.upsert_category_insight(insight);
        Ok(())
    }

    fn category_insights(&self) -> Result<Vec<CategoryInsight>> {
        Ok(self.state.read()?.insights.values().cloned().collect())
    }

    fn append_trend(&self, trend: &TrendAnalysis) -> Result<()> {
        self.state.write()?.trends.push(trend.clone());
        Ok(())
    }

    fn trends(&self) -> Result<Vec<TrendAnalysis>> {
        Ok(self.state.read()?.trends.clone())
    }

    fn delete_trends_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        Ok(self.state.write()?.delete_trends_before(cutoff))
    }
}
