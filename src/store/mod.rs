//! Persistence of bill records.

pub mod csv_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::BillRecord;

pub use csv_store::CsvRecordStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store is malformed: {0}")]
    Csv(#[from] csv::Error),

    #[error("record store could not be encoded: {0}")]
    Encoding(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only table of bill records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends `rows` after every existing row and returns the new row count.
    async fn append(&self, rows: &[BillRecord]) -> StoreResult<usize>;

    /// Every stored row in insertion order; empty when nothing was stored yet.
    async fn load_all(&self) -> StoreResult<Vec<BillRecord>>;

    /// Wipes the whole store. Clearing a store that does not exist succeeds.
    async fn clear(&self) -> StoreResult<()>;
}
