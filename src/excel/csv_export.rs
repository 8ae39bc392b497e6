//! Flat `field,value` export of a single record, for quick inspection.
//! Not part of the interchange layout and never re-imported.

use crate::error::{RankError, RankResult};
use crate::schema::Indicator;
use crate::types::{Focus, Research, Size, Status, UniversityRecord};

/// Form fields in display order, paired with their values
pub fn record_fields(record: &UniversityRecord) -> Vec<(&'static str, String)> {
    let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    let c = &record.classification;

    let mut fields: Vec<(&'static str, String)> = Indicator::ALL
        .iter()
        .map(|&indicator| (indicator.field_name(), number(record.score(indicator))))
        .collect();

    fields.push(("size", c.size.map(Size::code).unwrap_or_default().to_string()));
    fields.push(("focus", c.focus.map(Focus::code).unwrap_or_default().to_string()));
    fields.push((
        "research",
        c.research.map(Research::code).unwrap_or_default().to_string(),
    ));
    fields.push((
        "status",
        c.status.map(Status::code).unwrap_or_default().to_string(),
    ));
    fields.push((
        "ranking",
        record.rank.map(|r| r.to_string()).unwrap_or_default(),
    ));
    fields.push(("overall_score", number(record.overall_score)));
    fields
}

pub fn record_to_csv(record: &UniversityRecord) -> RankResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for (field, value) in record_fields(record) {
        writer
            .write_record([field, value.as_str()])
            .map_err(|e| RankError::Export(format!("Failed to write CSV line: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RankError::Export(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| RankError::Export(e.to_string()))
}
