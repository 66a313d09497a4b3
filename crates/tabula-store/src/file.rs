//! File-backed repository with atomic snapshot writes.
//!
//! The whole store is written out as one snapshot:
//!
//! ```text
//! +------------------+
//! | Magic: "TBL\x01" | 4 bytes - file identification
//! +------------------+
//! | Version: 1       | 4 bytes - u32 little-endian schema version
//! +------------------+
//! | JSON payload     | Variable - products, jobs, insights, trends
//! +------------------+
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tabula_model::{CategoryAggregate, CategoryInsight, CleanedRecord, EtlJob, TrendAnalysis};

use crate::error::{Result, StoreError};
use crate::repository::Repository;
use crate::state::StoreState;

/// Current snapshot schema version.
///
/// Files with a higher version are rejected.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Snapshot file magic bytes.
pub const MAGIC_BYTES: [u8; 4] = [b'T', b'B', b'L', 0x01];

const HEADER_LEN: usize = 8;

/// Product write buffered inside an open batch.
#[derive(Debug, Clone)]
enum PendingWrite {
    Upsert(CleanedRecord),
    Insert(CleanedRecord),
}

impl PendingWrite {
    fn apply(&self, state: &mut StoreState) -> Result<()> {
        match self {
            Self::Upsert(record) => {
                state.upsert_product(record);
                Ok(())
            }
            Self::Insert(record) => state.insert_product(record),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Last snapshot read from disk, with any pending writes applied.
    state: StoreState,
    /// `Some` while a batch is open.
    pending: Option<Vec<PendingWrite>>,
}

/// Repository persisted to a single snapshot file.
///
/// Several handles, in one process or many, may share a file. Every write
/// takes an exclusive lock on a sidecar `.lock` file, re-reads the snapshot,
/// applies the change and writes the snapshot back. Reads outside a batch
/// re-read the snapshot under a shared lock.
///
/// Product writes inside a batch are buffered and replayed onto the latest
/// snapshot at `commit_batch`. Job, insight, and trend writes go straight
/// to disk.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    lock_path: PathBuf,
    inner: Mutex<Inner>,
}

impl JsonFileRepository {
    /// Opens the store at `path`, starting empty when the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let repo = Self {
            lock_path: path.with_extension("lock"),
            path,
            inner: Mutex::new(Inner::default()),
        };
        let state = repo.read_snapshot()?;
        if repo.path.exists() {
            tracing::info!(
                path = %repo.path.display(),
                products = state.products.len(),
                jobs = state.jobs.len(),
                "Opened store"
            );
        } else {
            tracing::debug!(path = %repo.path.display(), "Store file not found, starting empty");
        }
        repo.lock_inner()?.state = state;
        Ok(repo)
    }

    /// Opens the store on a blocking thread.
    pub async fn open_async(path: PathBuf) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::open(path))
            .await
            .map_err(|e| StoreError::Serialization {
                source: Box::new(e),
            })?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, Inner>> {
        Ok(self.inner.lock()?)
    }

    /// Opens the sidecar lock file and locks it; released on drop.
    fn lock_file(&self, exclusive: bool) -> Result<File> {
        let io_err = |operation: &'static str, source: std::io::Error| StoreError::Io {
            operation,
            path: self.lock_path.clone(),
            source,
        };
        let file = File::options()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| io_err("open lock", e))?;
        if exclusive {
            file.lock().map_err(|e| io_err("lock", e))?;
        } else {
            file.lock_shared().map_err(|e| io_err("lock", e))?;
        }
        Ok(file)
    }

    /// Reads the snapshot under a shared lock; empty when there is no file.
    fn read_snapshot(&self) -> Result<StoreState> {
        if !self.path.exists() {
            return Ok(StoreState::default());
        }
        let _lock = self.lock_file(false)?;
        load_snapshot(&self.path)
    }

    /// Runs `f` on the latest snapshot under an exclusive lock and saves it.
    ///
    /// The cached state is replaced only after the save succeeds, with any
    /// pending batch writes replayed on top.
    fn write_through<T>(
        &self,
        inner: &mut Inner,
        f: impl FnOnce(&mut StoreState) -> Result<T>,
    ) -> Result<T> {
        ensure_parent(&self.path)?;
        let _lock = self.lock_file(true)?;
        let mut state = load_snapshot(&self.path)?;
        let value = f(&mut state)?;
        save_snapshot(&state, &self.path)?;

        if let Some(pending) = &inner.pending {
            for write in pending {
                // A replay conflict resurfaces at commit.
                let _ = write.apply(&mut state);
            }
        }
        inner.state = state;
        Ok(value)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut inner = self.lock_inner()?;
        self.write_through(&mut inner, f)
    }

    /// Buffers a product write inside a batch, else writes it through.
    fn mutate_products(&self, write: PendingWrite) -> Result<()> {
        let mut inner = self.lock_inner()?;
        if inner.pending.is_none() {
            return self.write_through(&mut inner, |state| write.apply(state));
        }
        let Inner { state, pending } = &mut *inner;
        write.apply(state)?;
        if let Some(pending) = pending {
            pending.push(write);
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T> {
        let mut inner = self.lock_inner()?;
        if inner.pending.is_none() {
            inner.state = self.read_snapshot()?;
        }
        Ok(f(&inner.state))
    }
}

impl Repository for JsonFileRepository {
    fn upsert_product(&self, record: &CleanedRecord) -> Result<()> {
        self.mutate_products(PendingWrite::Upsert(record.clone()))
    }

    fn insert_product(&self, record: &CleanedRecord) -> Result<()> {
        self.mutate_products(PendingWrite::Insert(record.clone()))
    }

    fn get_product(&self, product_id: &str) -> Result<Option<CleanedRecord>> {
        self.read(|state| state.products.get(product_id).cloned())
    }

    fn all_products(&self) -> Result<Vec<CleanedRecord>> {
        self.read(|state| state.products.values().cloned().collect())
    }

    fn product_count(&self) -> Result<u64> {
        self.read(|state| state.products.len() as u64)
    }

    fn begin_batch(&self) -> Result<()> {
        let mut inner = self.lock_inner()?;
        inner.state = self.read_snapshot()?;
        inner.pending = Some(Vec::new());
        Ok(())
    }

    /// Replays the batch onto the latest snapshot. A plain insert that
    /// collides with a row written by another handle fails the whole batch.
    fn commit_batch(&self) -> Result<()> {
        let mut inner = self.lock_inner()?;
        let pending = inner.pending.take().unwrap_or_default();
        let result = self.write_through(&mut inner, |state| {
            pending.iter().try_for_each(|write| write.apply(state))
        });
        if result.is_err() {
            inner.state = self.read_snapshot()?;
        }
        result
    }

    fn aggregate_by_category(&self) -> Result<Vec<CategoryAggregate>> {
        self.read(StoreState::aggregate_by_category)
    }

    fn create_job(&self, job: &EtlJob) -> Result<()> {
        self.mutate(|state| state.create_job(job))
    }

    fn update_job(&self, job: &EtlJob) -> Result<()> {
        self.mutate(|state| state.update_job(job))
    }

    fn get_job(&self, id: &str) -> Result<Option<EtlJob>> {
        self.read(|state| state.jobs.get(id).cloned())
    }

    fn recent_jobs(&self, limit: usize) -> Result<Vec<EtlJob>> {
        self.read(|state| state.recent_jobs(limit))
    }

    fn delete_jobs_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.mutate(|state| Ok(state.delete_jobs_before(cutoff)))
    }

    fn upsert_category_insight(&self, insight: &CategoryInsight) -> Result<()> {
        self.mutate(|state| {
            state.upsert_category_insight(insight);
            Ok(())
        })
    }

    fn category_insights(&self) -> Result<Vec<CategoryInsight>> {
        self.read(|state| state.insights.values().cloned().collect())
    }

    fn append_trend(&self, trend: &TrendAnalysis) -> Result<()> {
        self.mutate(|state| {
            state.trends.push(trend.clone());
            Ok(())
        })
    }

    fn trends(&self) -> Result<Vec<TrendAnalysis>> {
        self.read(|state| state.trends.clone())
    }

    fn delete_trends_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.mutate(|state| Ok(state.delete_trends_before(cutoff)))
    }
}

fn load_snapshot(path: &Path) -> Result<StoreState> {
    match fs::read(path) {
        Ok(bytes) => parse_snapshot(&bytes, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreState::default()),
        Err(e) => Err(StoreError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Writes the snapshot via temp file + rename.
fn save_snapshot(state: &StoreState, path: &Path) -> Result<()> {
    let bytes = serialize_snapshot(state)?;
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(&bytes).map_err(|e| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| StoreError::Io {
        operation: "replace",
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Saved store snapshot");
    Ok(())
}

fn serialize_snapshot(state: &StoreState) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(state).map_err(|e| StoreError::Serialization {
        source: Box::new(e),
    })?;

    let mut output = Vec::with_capacity(HEADER_LEN + payload.len());
    output.extend_from_slice(&MAGIC_BYTES);
    output.extend_from_slice(&CURRENT_SCHEMA_VERSION.to_le_bytes());
    output.extend_from_slice(&payload);
    Ok(output)
}

fn parse_snapshot(bytes: &[u8], path: &Path) -> Result<StoreState> {
    if bytes.len() < HEADER_LEN {
        return Err(StoreError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "file too small".to_string(),
        });
    }
    if bytes[0..4] != MAGIC_BYTES {
        return Err(StoreError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "not a tabula store file (invalid magic bytes)".to_string(),
        });
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    serde_json::from_slice(&bytes[HEADER_LEN..]).map_err(|e| StoreError::Serialization {
        source: Box::new(e),
    })
}
