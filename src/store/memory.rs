use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{latest_match, RecordFilter, RecordStore};
use crate::error::RankResult;
use crate::types::{InsertPayload, StoredRow};

/// In-process store, one vector per table
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<StoredRow>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn bulk_insert(
        &self,
        table: &str,
        rows: Vec<InsertPayload>,
    ) -> RankResult<Vec<StoredRow>> {
        let accepted: Vec<StoredRow> = rows.into_iter().map(StoredRow::accept).collect();
        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .extend(accepted.iter().cloned());
        Ok(accepted)
    }

    async fn select_one(
        &self,
        table: &str,
        filter: &RecordFilter,
    ) -> RankResult<Option<StoredRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|rows| latest_match(rows.iter(), filter)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;
    use crate::types::{CellValue, SheetRow, UserId};

    fn payload(user: &str, name: &str, rank: f64) -> InsertPayload {
        InsertPayload {
            user_id: UserId::new(user),
            row: SheetRow::new()
                .with(Column::Name, CellValue::text(name))
                .with(Column::Rank, Some(CellValue::Number(rank))),
        }
    }

    #[tokio::test]
    async fn test_insert_then_select() {
        let store = MemoryStore::new();
        let inserted = store
            .bulk_insert("t", vec![payload("u1", "UCL", 7.0), payload("u1", "ETH", 8.0)])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);
        assert_eq!(store.count("t").await, 2);

        let found = store
            .select_one("t", &RecordFilter::new("ETH", UserId::new("u1")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.row.get(Column::Rank), Some(&CellValue::Number(8.0)));
    }

    #[tokio::test]
    async fn test_select_is_scoped_to_user_and_latest() {
        let store = MemoryStore::new();
        store
            .bulk_insert("t", vec![payload("u1", "UCL", 7.0), payload("u2", "UCL", 1.0)])
            .await
            .unwrap();
        store
            .bulk_insert("t", vec![payload("u1", "UCL", 9.0)])
            .await
            .unwrap();

        let found = store
            .select_one("t", &RecordFilter::new("UCL", UserId::new("u1")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.row.get(Column::Rank), Some(&CellValue::Number(9.0)));

        let missing = store
            .select_one("other", &RecordFilter::new("UCL", UserId::new("u1")))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
