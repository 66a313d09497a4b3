//! Storage for cleaned products, load jobs, and derived insights.
//!
//! The loader talks to storage only through the [`Repository`] trait, so
//! any backend offering keyed upsert, group-by aggregation and atomic row
//! updates can sit behind it.
//!
//! # Features
//!
//! - **In-memory store** for tests and one-shot runs
//! - **File store** holding a JSON snapshot behind a versioned header
//! - **Atomic writes** (temp file + rename) so a crash never leaves a
//!   half-written snapshot
//!
//! # Example
//!
//! ```ignore
//! use tabula_store::{JsonFileRepository, Repository};
//!
//! let repo = JsonFileRepository::open("catalog.tbl")?;
//! repo.upsert_product(&record)?;
//! let categories = repo.aggregate_by_category()?;
//! ```

mod error;
mod file;
mod memory;
mod repository;
mod state;

pub use error::{Result, StoreError};
pub use file::{CURRENT_SCHEMA_VERSION, JsonFileRepository, MAGIC_BYTES};
pub use memory::MemoryRepository;
pub use repository::Repository;
pub use state::aggregate_products;
