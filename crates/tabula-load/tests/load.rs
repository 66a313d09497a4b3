//! End-to-end loader behavior against in-memory and failing stores.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use tabula_load::{BatchProgress, LoadError, LoadOptions, Loader};
use tabula_model::{
    CategoryAggregate, CategoryInsight, CleanedRecord, EtlJob, JobStatus, PriceRange,
    TrendAnalysis,
};
use tabula_store::{MemoryRepository, Repository, Result, StoreError};

fn catalog(n: usize) -> Vec<CleanedRecord> {
    (0..n)
        .map(|i| {
            let mut record = CleanedRecord::new(
                format!("SKU{i:05}"),
                format!("Product {i}"),
                ["Home", "Audio", "Office"][i % 3],
                50.0 + i as f64,
                100.0 + i as f64,
                3.0 + (i % 3) as f64,
                (i * 10) as u64,
            );
            record.price_range = Some(PriceRange::from_price(record.discounted_price));
            record
        })
        .collect()
}

/// Delegates to a memory store, failing chosen calls.
#[derive(Default)]
struct FlakyRepository {
    inner: MemoryRepository,
    /// 1-based batch number whose `begin_batch` fails.
    fail_begin_on: Option<usize>,
    /// 1-based batch number whose `commit_batch` fails.
    fail_commit_on: Option<usize>,
    /// Job writes carrying this status are refused.
    refuse_job_status: Option<JobStatus>,
    fail_insights: bool,
    /// Every job row `update_job` stored, in order.
    job_writes: Mutex<Vec<EtlJob>>,
    begins: AtomicUsize,
    commits: AtomicUsize,
}

fn injected() -> StoreError {
    StoreError::Serialization {
        source: "injected failure".into(),
    }
}

impl Repository for FlakyRepository {
    fn upsert_product(&self, record: &CleanedRecord) -> Result<()> {
        self.inner.upsert_product(record)
    }

    fn insert_product(&self, record: &CleanedRecord) -> Result<()> {
        self.inner.insert_product(record)
    }

    fn get_product(&self, product_id: &str) -> Result<Option<CleanedRecord>> {
        self.inner.get_product(product_id)
    }

    fn all_products(&self) -> Result<Vec<CleanedRecord>> {
        self.inner.all_products()
    }

    fn product_count(&self) -> Result<u64> {
        self.inner.product_count()
    }

    fn begin_batch(&self) -> Result<()> {
        let n = self.begins.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_begin_on == Some(n) {
            return Err(injected());
        }
        self.inner.begin_batch()
    }

    fn commit_batch(&self) -> Result<()> {
        let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_commit_on == Some(n) {
            return Err(injected());
        }
        self.inner.commit_batch()
    }

    fn aggregate_by_category(&self) -> Result<Vec<CategoryAggregate>> {
        if self.fail_insights {
            return Err(injected());
        }
        self.inner.aggregate_by_category()
    }

    fn create_job(&self, job: &EtlJob) -> Result<()> {
        self.inner.create_job(job)
    }

    fn update_job(&self, job: &EtlJob) -> Result<()> {
        if self.refuse_job_status == Some(job.status) {
            return Err(injected());
        }
        self.inner.update_job(job)?;
        self.job_writes.lock().unwrap().push(job.clone());
        Ok(())
    }

    fn get_job(&self, id: &str) -> Result<Option<EtlJob>> {
        self.inner.get_job(id)
    }

    fn recent_jobs(&self, limit: usize) -> Result<Vec<EtlJob>> {
        self.inner.recent_jobs(limit)
    }

    fn delete_jobs_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.inner.delete_jobs_before(cutoff)
    }

    fn upsert_category_insight(&self, insight: &CategoryInsight) -> Result<()> {
        self.inner.upsert_category_insight(insight)
    }

    fn category_insights(&self) -> Result<Vec<CategoryInsight>> {
        self.inner.category_insights()
    }

    fn append_trend(&self, trend: &TrendAnalysis) -> Result<()> {
        self.inner.append_trend(trend)
    }

    fn trends(&self) -> Result<Vec<TrendAnalysis>> {
        self.inner.trends()
    }

    fn delete_trends_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.inner.delete_trends_before(cutoff)
    }
}

#[test]
fn test_batches_report_progress() {
    let repo = FlakyRepository::default();
    let seen: Mutex<Vec<BatchProgress>> = Mutex::new(Vec::new());
    let observer = |progress: &BatchProgress| seen.lock().unwrap().push(*progress);

    let result = Loader::new(&repo)
        .with_observer(&observer)
        .load(&catalog(250), "catalog.csv", &LoadOptions::default())
        .unwrap();

    assert_eq!(result.batches, 3);
    assert_eq!(result.records_success, 250);
    assert_eq!(result.status, JobStatus::Completed);
    assert!(result.success);

    let seen = seen.into_inner().unwrap();
    let processed: Vec<u64> = seen.iter().map(|p| p.records_processed).collect();
    assert_eq!(processed, vec![100, 200, 250]);
    assert!(seen.iter().all(|p| p.batch_count == 3 && p.total_records == 250));

    let writes = repo.job_writes.into_inner().unwrap();
    let stored: Vec<(JobStatus, u64, u64)> = writes
        .iter()
        .map(|job| (job.status, job.records_processed, job.records_success))
        .collect();
    assert_eq!(
        stored,
        vec![
            (JobStatus::Processing, 100, 100),
            (JobStatus::Processing, 200, 200),
            (JobStatus::Processing, 250, 250),
            (JobStatus::Completed, 250, 250),
        ]
    );
    assert!(writes.iter().all(|job| job.id == result.job_id));
}

#[test]
fn test_reload_with_upsert_is_idempotent() {
    let repo = MemoryRepository::new();
    let loader = Loader::new(&repo);
    let data = catalog(40);

    loader.load(&data, "a.csv", &LoadOptions::default()).unwrap();
    let first = repo.all_products().unwrap();
    let second_run = loader.load(&data, "a.csv", &LoadOptions::default()).unwrap();

    assert_eq!(second_run.records_success, 40);
    assert_eq!(repo.product_count().unwrap(), 40);
    assert_eq!(repo.all_products().unwrap(), first);
    assert_eq!(loader.recent_jobs(10).unwrap().len(), 2);
}

#[test]
fn test_failed_batch_start_counts_whole_batch() {
    let repo = FlakyRepository {
        fail_begin_on: Some(2),
        ..FlakyRepository::default()
    };
    let options = LoadOptions {
        batch_size: 10,
        ..LoadOptions::default()
    };

    let result = Loader::new(&repo).load(&catalog(30), "a.csv", &options).unwrap();

    assert_eq!(result.records_success, 20);
    assert_eq!(result.records_error, 10);
    assert_eq!(result.status, JobStatus::CompletedWithErrors);
    assert!(result.success);
    assert!(result.errors[0].starts_with("Batch 2:"));
    assert_eq!(repo.product_count().unwrap(), 20);
}

#[test]
fn test_failed_commit_turns_batch_into_errors() {
    let repo = FlakyRepository {
        fail_commit_on: Some(1),
        ..FlakyRepository::default()
    };
    let options = LoadOptions {
        batch_size: 10,
        ..LoadOptions::default()
    };

    let result = Loader::new(&repo).load(&catalog(15), "a.csv", &options).unwrap();

    assert_eq!(result.records_success, 5);
    assert_eq!(result.records_error, 10);
    assert!(!result.success);
}

#[test]
fn test_job_update_failure_aborts_and_marks_failed() {
    let repo = FlakyRepository {
        refuse_job_status: Some(JobStatus::Processing),
        ..FlakyRepository::default()
    };

    let err = Loader::new(&repo)
        .load(&catalog(5), "a.csv", &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Store(_)));

    let job = &repo.recent_jobs(1).unwrap()[0];
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.end_time.is_some());
    assert_eq!(job.error_messages, vec![err.to_string()]);
}

#[test]
fn test_finish_failure_returns_error() {
    let repo = FlakyRepository {
        refuse_job_status: Some(JobStatus::Completed),
        ..FlakyRepository::default()
    };

    let err = Loader::new(&repo)
        .load(&catalog(5), "a.csv", &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Store(_)));
    assert_eq!(repo.product_count().unwrap(), 5);

    // Completion was refused, so the failure mark is what gets stored.
    let job = &repo.recent_jobs(1).unwrap()[0];
    assert_eq!(job.status, JobStatus::Failed);
}

#[test]
fn test_insight_failure_is_recorded_not_fatal() {
    let repo = FlakyRepository {
        fail_insights: true,
        ..FlakyRepository::default()
    };

    let result = Loader::new(&repo)
        .load(&catalog(5), "a.csv", &LoadOptions::default())
        .unwrap();

    assert_eq!(result.status, JobStatus::Completed);
    assert!(result.success);
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.starts_with("Insight generation failed"))
    );
    let job = repo.get_job(&result.job_id).unwrap().unwrap();
    assert_eq!(job.error_messages.len(), 1);
}

#[test]
fn test_success_threshold_is_configurable() {
    // 3 of 10 records already exist and are refused by a plain insert.
    fn run(threshold: f64) -> bool {
        let repo = MemoryRepository::new();
        let loader = Loader::new(&repo);
        let data = catalog(10);
        loader
            .load(&data[..3], "seed.csv", &LoadOptions::default())
            .unwrap();

        let options = LoadOptions {
            upsert: false,
            skip_duplicates: false,
            success_threshold: threshold,
            ..LoadOptions::default()
        };
        let result = loader.load(&data, "a.csv", &options).unwrap();
        assert_eq!(result.records_error, 3);
        assert_eq!(result.records_success, 7);
        result.success
    }

    assert!(!run(0.2));
    assert!(!run(0.3));
    assert!(run(0.5));
}

#[test]
fn test_error_list_is_bounded() {
    let repo = MemoryRepository::new();
    let loader = Loader::new(&repo);
    let data = catalog(120);
    loader.load(&data, "seed.csv", &LoadOptions::default()).unwrap();

    let options = LoadOptions {
        upsert: false,
        skip_duplicates: false,
        ..LoadOptions::default()
    };
    let result = loader.load(&data, "a.csv", &options).unwrap();
    assert_eq!(result.records_error, 120);
    assert_eq!(result.errors.len(), tabula_model::MAX_JOB_ERROR_MESSAGES);
}

#[test]
fn test_integrity_and_insights_after_load() {
    let repo = MemoryRepository::new();
    let loader = Loader::new(&repo);
    loader
        .load(&catalog(9), "a.csv", &LoadOptions::default())
        .unwrap();

    let report = loader.validate_data_integrity().unwrap();
    assert!(report.is_valid);
    assert_eq!(report.total_products, 9);

    let summary = loader.regenerate_insights().unwrap();
    assert_eq!(summary.categories, 3);
    assert_eq!(summary.trend.total_products, 9);
    assert_eq!(repo.trends().unwrap().len(), 2);
}
