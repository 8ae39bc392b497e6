use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::{latest_match, RecordFilter, RecordStore};
use crate::error::{RankError, RankResult};
use crate::types::{InsertPayload, StoredRow};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    tables: HashMap<String, Vec<StoredRow>>,
}

/// JSON document on disk, rewritten on every insert. Used by the CLI and
/// the server so rows survive between runs.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> RankResult<StoreDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                RankError::Store(format!(
                    "Store file {} is corrupt: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(RankError::Store(format!(
                "Failed to read store {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, document: &StoreDocument) -> RankResult<()> {
        let json = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            RankError::Store(format!(
                "Failed to write store {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn bulk_insert(
        &self,
        table: &str,
        rows: Vec<InsertPayload>,
    ) -> RankResult<Vec<StoredRow>> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        let accepted: Vec<StoredRow> = rows.into_iter().map(StoredRow::accept).collect();
        document
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(accepted.iter().cloned());

        self.save(&document).await?;
        debug!(table, rows = accepted.len(), path = %self.path.display(), "rows written");
        Ok(accepted)
    }

    async fn select_one(
        &self,
        table: &str,
        filter: &RecordFilter,
    ) -> RankResult<Option<StoredRow>> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document
            .tables
            .get(table)
            .and_then(|rows| latest_match(rows.iter(), filter)))
    }
}
