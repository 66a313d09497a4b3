//! Repository behavior shared by both stores.

use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use tempfile::tempdir;

use tabula_model::{CategoryAggregate, CategoryInsight, CleanedRecord, EtlJob, JobStatus, TrendAnalysis};
use tabula_store::{JsonFileRepository, MemoryRepository, Repository, StoreError};

fn product(id: &str, category: &str, rating: f64) -> CleanedRecord {
    CleanedRecord::new(id, format!("Item {id}"), category, 50.0, 100.0, rating, 3)
}

fn trend(id: &str, created_days_ago: i64) -> TrendAnalysis {
    let created_at = Utc::now() - Duration::days(created_days_ago);
    TrendAnalysis {
        id: id.to_string(),
        date: created_at.date_naive(),
        total_products: 1,
        price_range_distribution: BTreeMap::new(),
        category_distribution: BTreeMap::new(),
        created_at,
    }
}

fn exercise(repo: &dyn Repository) {
    // Products
    repo.begin_batch().unwrap();
    repo.upsert_product(&product("A", "Home", 4.0)).unwrap();
    repo.upsert_product(&product("B", "Home", 5.0)).unwrap();
    repo.upsert_product(&product("C", "Audio", 3.0)).unwrap();
    repo.commit_batch().unwrap();
    assert!(matches!(
        repo.insert_product(&product("A", "Home", 1.0)),
        Err(StoreError::Duplicate { .. })
    ));
    assert_eq!(repo.product_count().unwrap(), 3);

    let aggregates: Vec<CategoryAggregate> = repo.aggregate_by_category().unwrap();
    assert_eq!(aggregates.len(), 2);
    assert_eq!(aggregates[1].category, "Home");
    assert_eq!(aggregates[1].average_rating, 4.5);
    assert_eq!(aggregates[1].top_rated_product.as_deref(), Some("Item B"));

    // Jobs
    let mut job = EtlJob::new("job-1", "upload.csv", Utc::now() - Duration::days(60));
    repo.create_job(&job).unwrap();
    job.status = JobStatus::Completed;
    repo.update_job(&job).unwrap();
    repo.create_job(&EtlJob::new("job-2", "upload.csv", Utc::now()))
        .unwrap();
    assert_eq!(repo.recent_jobs(1).unwrap()[0].id, "job-2");
    assert_eq!(
        repo.get_job("job-1").unwrap().unwrap().status,
        JobStatus::Completed
    );

    // Insights and trends
    let insight = CategoryInsight::from_aggregate(aggregates[0].clone(), Utc::now());
    repo.upsert_category_insight(&insight).unwrap();
    repo.upsert_category_insight(&insight).unwrap();
    assert_eq!(repo.category_insights().unwrap().len(), 1);

    repo.append_trend(&trend("old", 45)).unwrap();
    repo.append_trend(&trend("new", 0)).unwrap();

    // Retention
    let cutoff = Utc::now() - Duration::days(30);
    assert_eq!(repo.delete_jobs_before(cutoff).unwrap(), 1);
    assert_eq!(repo.delete_trends_before(cutoff).unwrap(), 1);
    assert_eq!(repo.trends().unwrap()[0].id, "new");
    assert!(repo.get_job("job-2").unwrap().is_some());
}

#[test]
fn test_memory_repository() {
    exercise(&MemoryRepository::new());
}

#[test]
fn test_file_repository() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.tbl");
    exercise(&JsonFileRepository::open(&path).unwrap());

    let reopened = JsonFileRepository::open(&path).unwrap();
    assert_eq!(reopened.product_count().unwrap(), 3);
    assert_eq!(reopened.recent_jobs(10).unwrap().len(), 1);
    assert_eq!(reopened.trends().unwrap().len(), 1);
}

#[tokio::test]
async fn test_open_async() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.tbl");
    {
        let repo = JsonFileRepository::open(&path).unwrap();
        repo.upsert_product(&product("A", "Home", 4.0)).unwrap();
    }

    let repo = JsonFileRepository::open_async(path.clone()).await.unwrap();
    assert_eq!(repo.path(), path.as_path());
    assert_eq!(repo.product_count().unwrap(), 1);
}

#[test]
fn test_trend_date_is_serialized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.tbl");
    let repo = JsonFileRepository::open(&path).unwrap();
    let mut snapshot = trend("t", 0);
    snapshot.date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    repo.append_trend(&snapshot).unwrap();

    let reopened = JsonFileRepository::open(&path).unwrap();
    assert_eq!(reopened.trends().unwrap()[0], snapshot);
}

#[test]
fn test_handles_sharing_a_file_keep_each_others_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.tbl");
    let a = JsonFileRepository::open(&path).unwrap();
    let b = JsonFileRepository::open(&path).unwrap();

    a.upsert_product(&product("A", "Home", 4.0)).unwrap();
    b.upsert_product(&product("B", "Home", 5.0)).unwrap();
    a.create_job(&EtlJob::new("job-a", "a.csv", Utc::now())).unwrap();
    b.create_job(&EtlJob::new("job-b", "b.csv", Utc::now())).unwrap();
    assert_eq!(a.product_count().unwrap(), 2);

    let reopened = JsonFileRepository::open(&path).unwrap();
    let ids: Vec<String> = reopened
        .all_products()
        .unwrap()
        .into_iter()
        .map(|p| p.product_id)
        .collect();
    assert_eq!(ids, ["A", "B"]);
    assert_eq!(reopened.recent_jobs(10).unwrap().len(), 2);
}

#[test]
fn test_batch_commit_merges_with_concurrent_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.tbl");
    let a = JsonFileRepository::open(&path).unwrap();
    let b = JsonFileRepository::open(&path).unwrap();

    a.begin_batch().unwrap();
    a.upsert_product(&product("A", "Home", 4.0)).unwrap();
    b.upsert_product(&product("B", "Audio", 3.0)).unwrap();
    b.create_job(&EtlJob::new("job-b", "b.csv", Utc::now())).unwrap();
    a.commit_batch().unwrap();

    let reopened = JsonFileRepository::open(&path).unwrap();
    assert_eq!(reopened.product_count().unwrap(), 2);
    assert!(reopened.get_job("job-b").unwrap().is_some());
}

#[test]
fn test_batch_insert_collision_fails_commit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.tbl");
    let a = JsonFileRepository::open(&path).unwrap();
    let b = JsonFileRepository::open(&path).unwrap();

    a.begin_batch().unwrap();
    a.insert_product(&product("A", "Home", 4.0)).unwrap();
    a.insert_product(&product("Z", "Home", 4.0)).unwrap();
    b.insert_product(&product("Z", "Audio", 1.0)).unwrap();
    assert!(matches!(a.commit_batch(), Err(StoreError::Duplicate { .. })));

    assert_eq!(a.product_count().unwrap(), 1);
    assert_eq!(a.get_product("Z").unwrap().unwrap().category, "Audio");
}

#[test]
fn test_concurrent_writers_on_threads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.tbl");

    std::thread::scope(|scope| {
        for writer in 0..4 {
            let path = path.clone();
            scope.spawn(move || {
                let repo = JsonFileRepository::open(&path).unwrap();
                for i in 0..10 {
                    repo.upsert_product(&product(&format!("W{writer}-{i}"), "Home", 4.0))
                        .unwrap();
                }
            });
        }
    });

    let reopened = JsonFileRepository::open(&path).unwrap();
    assert_eq!(reopened.product_count().unwrap(), 40);
}
