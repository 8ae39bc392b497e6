//! Import service: workbook bytes → validated rows → one bulk insert

use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{RankError, RankResult};
use crate::excel::SheetImporter;
use crate::store::{RecordStore, UNIVERSITY_TABLE};
use crate::types::{InsertPayload, SheetRow, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// Rows read from the sheet after blank-row filtering
    pub parsed: usize,
    /// Rows the store reports as inserted
    pub inserted: usize,
}

/// Releases the busy flag when the import finishes, on any path
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ImportService<S: RecordStore + ?Sized> {
    store: Arc<S>,
    busy: AtomicBool,
}

impl<S: RecordStore + ?Sized> ImportService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            busy: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> RankResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RankError::ImportInProgress)?;
        Ok(BusyGuard(&self.busy))
    }

    /// Read the file, then import it. A second call while one is running is
    /// rejected rather than queued.
    pub async fn import_file(&self, user: &UserId, path: &Path) -> RankResult<ImportOutcome> {
        let _guard = self.begin()?;
        let bytes = tokio::fs::read(path).await?;
        self.run(user, bytes).await
    }

    pub async fn import_bytes(&self, user: &UserId, bytes: Vec<u8>) -> RankResult<ImportOutcome> {
        let _guard = self.begin()?;
        self.run(user, bytes).await
    }

    async fn run(&self, user: &UserId, bytes: Vec<u8>) -> RankResult<ImportOutcome> {
        let rows = SheetImporter::from_bytes(bytes).read_rows()?;
        let parsed = rows.len();
        let payloads = to_payloads(rows, user);

        let inserted = match self.store.bulk_insert(UNIVERSITY_TABLE, payloads).await {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!(user = %user, error = %e, "store rejected import batch");
                return Err(e);
            }
        };

        info!(user = %user, parsed, inserted = inserted.len(), "import complete");
        Ok(ImportOutcome {
            parsed,
            inserted: inserted.len(),
        })
    }
}

/// Tag each row with the importing user
pub fn to_payloads(rows: Vec<SheetRow>, user: &UserId) -> Vec<InsertPayload> {
    rows.into_iter()
        .map(|row| InsertPayload {
            user_id: user.clone(),
            row,
        })
        .collect()
}
