//! Spreadsheet interchange
//!
//! - Import: interchange workbook (.xlsx/.xls) → typed rows
//! - Export: rows, records or the sample set → .xlsx in the same layout
//! - Flat CSV export of one record

pub mod csv_export;
mod exporter;
mod importer;
pub mod sample;

pub use csv_export::record_to_csv;
pub use exporter::SheetExporter;
pub use importer::{rows_from_grid, SheetImporter};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv";
