//! Excel importer - interchange workbook → typed rows

use crate::error::{RankError, RankResult};
use crate::schema::{Column, HEADER_ROW};
use crate::types::{CellValue, SheetRow};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Reads the first populated sheet of a workbook laid out as three blank
/// rows, a header row, then data rows
pub struct SheetImporter {
    source: Source,
}

impl SheetImporter {
    /// Create an importer over a file on disk (.xlsx, .xls, .xlsb, .ods)
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Source::Path(path.as_ref().to_path_buf()),
        }
    }

    /// Create an importer over in-memory workbook bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            source: Source::Bytes(bytes),
        }
    }

    /// Decode, filter and map the data rows
    pub fn read_rows(&self) -> RankResult<Vec<SheetRow>> {
        let grid = self.read_grid()?;
        rows_from_grid(&grid)
    }

    /// Array-of-arrays view starting at the header row
    fn read_grid(&self) -> RankResult<Vec<Vec<Data>>> {
        let bytes = match &self.source {
            Source::Path(path) => std::fs::read(path)?,
            Source::Bytes(bytes) => bytes.clone(),
        };

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| RankError::Import(e.to_string()))?;

        for sheet_name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| RankError::Import(format!("sheet '{}': {}", sheet_name, e)))?;

            if range.is_empty() {
                continue;
            }

            let declared_end = declared_end_row(&mut workbook, &sheet_name);
            debug!(
                sheet = %sheet_name,
                size = ?range.get_size(),
                declared_end = ?declared_end,
                "reading sheet"
            );
            return Ok(grid_from_range(&range, declared_end));
        }

        Ok(Vec::new())
    }
}

/// Last row of the sheet's declared `<dimension>`. Unlike the cell range,
/// this still covers trailing rows that only hold blank or formatted cells.
fn declared_end_row<RS: Read + Seek>(workbook: &mut Sheets<RS>, sheet: &str) -> Option<u32> {
    match workbook {
        Sheets::Xlsx(xlsx) => match xlsx.worksheet_cells_reader(sheet) {
            Ok(reader) => Some(reader.dimensions().end.0),
            Err(e) => {
                debug!(sheet, error = %e, "no declared dimension");
                None
            }
        },
        _ => None,
    }
}

/// Cut the range at the fixed header offset. Positions are absolute sheet
/// coordinates, so blank leading rows are never mistaken for headers. Rows
/// past the populated range, up to `declared_end`, come through as empty.
fn grid_from_range(range: &Range<Data>, declared_end: Option<u32>) -> Vec<Vec<Data>> {
    let (Some((_, start_col)), Some((last_row, end_col))) = (range.start(), range.end()) else {
        return Vec::new();
    };
    let end_row = declared_end.map_or(last_row, |declared| declared.max(last_row));

    if end_row < HEADER_ROW {
        return Vec::new();
    }

    (HEADER_ROW..=end_row)
        .map(|row| {
            (start_col..=end_col)
                .map(|col| range.get_value((row, col)).cloned().unwrap_or(Data::Empty))
                .collect()
        })
        .collect()
}

/// Map the header row and data rows into typed rows
pub fn rows_from_grid(grid: &[Vec<Data>]) -> RankResult<Vec<SheetRow>> {
    if grid.len() < 2 {
        return Err(RankError::MalformedFile);
    }

    let headers: Vec<Option<Column>> = grid[0]
        .iter()
        .map(|cell| {
            let text = header_text(cell)?;
            let column = Column::from_header(&text);
            if column.is_none() {
                warn!(header = %text, "ignoring unknown column");
            }
            column
        })
        .collect();

    if headers.iter().all(Option::is_none) {
        return Err(RankError::SchemaMismatch(
            "no recognised column headers in row 4".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for (idx, cells) in grid[1..].iter().enumerate() {
        let values: Vec<Option<CellValue>> = cells.iter().map(cell_value).collect();

        if values.iter().all(Option::is_none) {
            debug!(sheet_row = (idx as u32 + HEADER_ROW + 2), "skipping empty row");
            continue;
        }

        let mut row = SheetRow::new();
        for (column, value) in headers.iter().zip(values) {
            if let Some(column) = column {
                row.set(*column, value);
            }
        }
        derive_legacy_columns(&mut row);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(RankError::NoValidRows);
    }

    Ok(rows)
}

/// `Rank_Duplicate` falls back to `Rank` when the sheet leaves it blank
fn derive_legacy_columns(row: &mut SheetRow) {
    if row.get(Column::RankDuplicate).is_none() {
        let rank = row.get(Column::Rank).cloned();
        row.set(Column::RankDuplicate, rank);
    }
}

fn header_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

/// Passthrough conversion; blank strings count as absent
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::String(s) => CellValue::text(s.clone()),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.clone()),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
        Data::Empty => None,
    }
}
