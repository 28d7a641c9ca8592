//! CSV file implementation of `RecordStore`.
//!
//! Every append rewrites the whole file. There is no locking and no atomic
//! rename: a crash mid-write can lose the table.

use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{RecordStore, StoreError, StoreResult};
use crate::domain::BillRecord;

#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_existing(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn decode(bytes: &[u8]) -> StoreResult<Vec<BillRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for row in reader.deserialize::<BillRecord>() {
        rows.push(row?);
    }
    Ok(rows)
}

fn encode(rows: &[BillRecord]) -> StoreResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(BillRecord::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| StoreError::Encoding(e.to_string()))
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn append(&self, rows: &[BillRecord]) -> StoreResult<usize> {
        let mut table = match self.read_existing().await? {
            Some(bytes) => decode(&bytes)?,
            None => Vec::new(),
        };
        let previous = table.len();
        table.extend_from_slice(rows);

        let bytes = encode(&table)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, bytes).await?;

        tracing::info!(
            path = %self.path.display(),
            appended = rows.len(),
            previous,
            total = table.len(),
            "Appended bill records"
        );
        Ok(table.len())
    }

    async fn load_all(&self) -> StoreResult<Vec<BillRecord>> {
        match self.read_existing().await? {
            Some(bytes) => decode(&bytes),
            None => Ok(Vec::new()),
        }
    }

    async fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::warn!(path = %self.path.display(), "Record store cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
