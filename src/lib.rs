//! UniRank - university ranking data entry toolkit
//!
//! This library computes the ratio-based ranking indicators and moves
//! university ranking rows between Excel workbooks and a record store.
//!
//! # Features
//!
//! - FSR / IFR / ISR calculators with per-form observable state
//! - Excel import (headers on row 4, data from row 5) via calamine
//! - Excel export and the ten-university sample workbook via rust_xlsxwriter
//! - Fixed 33-column interchange schema shared by import and export
//! - Flat `field,value` CSV export of a single record
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use unirank::excel::{SheetExporter, SheetImporter};
//! use unirank::types::UniversityRecord;
//!
//! SheetExporter::sample().export(Path::new("sample.xlsx"))?;
//!
//! let rows = SheetImporter::new("sample.xlsx").read_rows()?;
//! let first = UniversityRecord::from_row(&rows[0]);
//! println!("{} ranked {:?}", first.name, first.rank);
//! # Ok::<(), unirank::error::RankError>(())
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod import;
pub mod records;
pub mod schema;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{RankError, RankResult};
pub use schema::{Column, Indicator};
pub use types::{CellValue, SheetRow, UniversityRecord, UserId};
