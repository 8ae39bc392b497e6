//! Record-level operations against the store

use tracing::info;

use crate::error::{RankError, RankResult};
use crate::store::{RecordFilter, RecordStore, UNIVERSITY_TABLE};
use crate::types::{InsertPayload, StoredRow, UniversityRecord, UserId};

/// Load the most recent row stored under `name` for this user
pub async fn load_named_record<S: RecordStore + ?Sized>(
    store: &S,
    user: &UserId,
    name: &str,
) -> RankResult<UniversityRecord> {
    let filter = RecordFilter::new(name, user.clone());
    let stored = store
        .select_one(UNIVERSITY_TABLE, &filter)
        .await?
        .ok_or_else(|| RankError::NotFound(name.to_string()))?;
    Ok(UniversityRecord::from_row(&stored.row))
}

/// Validate a form record and store it as a single-row insert
pub async fn submit_record<S: RecordStore + ?Sized>(
    store: &S,
    user: &UserId,
    record: &UniversityRecord,
) -> RankResult<StoredRow> {
    let errors = record.validate();
    if !errors.is_empty() {
        return Err(RankError::Validation(errors));
    }

    let payload = InsertPayload {
        user_id: user.clone(),
        row: record.to_row(),
    };
    let stored = store
        .bulk_insert(UNIVERSITY_TABLE, vec![payload])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| RankError::Store("Store accepted no rows".to_string()))?;

    info!(user = %user, name = %record.name, id = %stored.id, "record submitted");
    Ok(stored)
}
