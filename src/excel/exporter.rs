//! Excel exporter implementation

use crate::error::{RankError, RankResult};
use crate::schema::{COLUMNS, HEADER_ROW, SHEET_NAME};
use crate::types::{CellValue, SheetRow, UniversityRecord};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

/// Writes rows in the interchange layout: three blank rows, the header row,
/// then one row per record. Output re-imports through `SheetImporter`.
pub struct SheetExporter {
    rows: Vec<SheetRow>,
}

impl SheetExporter {
    pub fn new(rows: Vec<SheetRow>) -> Self {
        Self { rows }
    }

    pub fn from_records(records: &[UniversityRecord]) -> Self {
        Self::new(records.iter().map(UniversityRecord::to_row).collect())
    }

    /// Onboarding workbook with the ten demonstration rows
    pub fn sample() -> Self {
        Self::new(super::sample::sample_rows())
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    /// Build the workbook in memory (.xlsx bytes)
    pub fn to_bytes(&self) -> RankResult<Vec<u8>> {
        let mut workbook = self.build()?;
        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| RankError::Export(format!("Failed to build workbook: {}", e)))?;
        info!(rows = self.rows.len(), bytes = bytes.len(), "exported workbook");
        Ok(bytes)
    }

    /// Save the workbook to an .xlsx file
    pub fn export(&self, output_path: &Path) -> RankResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(output_path, bytes)?;
        Ok(())
    }

    fn build(&self) -> RankResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| RankError::Export(format!("Failed to set worksheet name: {}", e)))?;

        let header_format = Format::new().set_bold();

        for (col_idx, spec) in COLUMNS.iter().enumerate() {
            let col = col_idx as u16;
            worksheet
                .set_column_width(col, spec.width)
                .map_err(|e| RankError::Export(format!("Failed to set column width: {}", e)))?;
            worksheet
                .write_string_with_format(HEADER_ROW, col, spec.header, &header_format)
                .map_err(|e| RankError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, row) in self.rows.iter().enumerate() {
            let excel_row = HEADER_ROW + 1 + row_idx as u32;
            for (col_idx, (_, value)) in row.iter().enumerate() {
                if let Some(value) = value {
                    Self::write_cell_value(worksheet, excel_row, col_idx as u16, value)?;
                }
            }
        }

        Ok(workbook)
    }

    /// Write a single cell value based on its type; absent cells stay blank
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
    ) -> RankResult<()> {
        match value {
            CellValue::Number(n) => {
                worksheet
                    .write_number(row, col, *n)
                    .map_err(|e| RankError::Export(format!("Failed to write number: {}", e)))?;
            }
            CellValue::Text(s) => {
                worksheet
                    .write_string(row, col, s)
                    .map_err(|e| RankError::Export(format!("Failed to write text: {}", e)))?;
            }
            CellValue::Bool(b) => {
                worksheet
                    .write_boolean(row, col, *b)
                    .map_err(|e| RankError::Export(format!("Failed to write boolean: {}", e)))?;
            }
        }
        Ok(())
    }
}
