//! Persistence collaborator
//!
//! The calculation and interchange code only needs two shapes from storage:
//! a bulk insert and a single-row lookup. Anything implementing
//! [`RecordStore`] can stand in.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::RankResult;
use crate::types::{InsertPayload, StoredRow, UserId};

/// Table holding imported and submitted university rows
pub const UNIVERSITY_TABLE: &str = "university_excel_data";

/// Lookup by institution name within one user's rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub name: String,
    pub user_id: UserId,
}

impl RecordFilter {
    pub fn new(name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            name: name.into(),
            user_id,
        }
    }

    pub fn matches(&self, row: &StoredRow) -> bool {
        row.user_id == self.user_id && row.row.name().as_deref() == Some(self.name.as_str())
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert every payload; returns the rows the store accepted
    async fn bulk_insert(
        &self,
        table: &str,
        rows: Vec<InsertPayload>,
    ) -> RankResult<Vec<StoredRow>>;

    /// Most recently inserted row matching the filter
    async fn select_one(&self, table: &str, filter: &RecordFilter)
        -> RankResult<Option<StoredRow>>;
}

/// Latest match, by insertion order
pub(crate) fn latest_match<'a>(
    rows: impl DoubleEndedIterator<Item = &'a StoredRow>,
    filter: &RecordFilter,
) -> Option<StoredRow> {
    rows.rev().find(|row| filter.matches(row)).cloned()
}
