//! Excel interchange tests
//!
//! Export and import share one column table, so a workbook written here
//! must read back to the same rows and records.

use calamine::Reader;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::BTreeMap;
use tempfile::TempDir;
use unirank::error::RankError;
use unirank::excel::{record_to_csv, sample::sample_rows, SheetExporter, SheetImporter};
use unirank::schema::{Column, Indicator, SHEET_NAME};
use unirank::types::{
    CellValue, Classification, Focus, IndicatorEntry, Research, Size, Status, UniversityRecord,
};

fn uthm() -> UniversityRecord {
    let indicators: BTreeMap<Indicator, IndicatorEntry> = Indicator::ALL
        .iter()
        .enumerate()
        .map(|(i, &indicator)| {
            (
                indicator,
                IndicatorEntry {
                    score: Some(10.0 + i as f64 * 2.5),
                    rank: Some(500 + i as u32),
                },
            )
        })
        .collect();

    UniversityRecord {
        index: Some(1),
        rank: Some(1201),
        previous_rank: Some(1150),
        name: "Universiti Tun Hussein Onn Malaysia".to_string(),
        country: Some("Malaysia".to_string()),
        region: Some("Asia".to_string()),
        classification: Classification {
            size: Some(Size::M),
            focus: Some(Focus::FO),
            research: Some(Research::LO),
            status: Some(Status::Public),
        },
        indicators,
        overall_score: Some(14.2),
    }
}

/// A single-sheet workbook with `rows` written from the top-left cell
fn workbook_with(rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// ROUND TRIPS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sample_workbook_reads_back_unchanged() {
    let bytes = SheetExporter::sample().to_bytes().unwrap();
    let rows = SheetImporter::from_bytes(bytes).read_rows().unwrap();
    assert_eq!(rows, sample_rows());
}

#[test]
fn test_record_survives_export_and_import() {
    let record = uthm();
    let bytes = SheetExporter::from_records(std::slice::from_ref(&record))
        .to_bytes()
        .unwrap();

    let rows = SheetImporter::from_bytes(bytes).read_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(Column::Column2), Some(&CellValue::Number(14.2)));
    assert_eq!(
        rows[0].get(Column::RankDuplicate),
        Some(&CellValue::Number(1201.0))
    );
    assert_eq!(UniversityRecord::from_row(&rows[0]), record);
}

#[test]
fn test_submitted_record_with_blank_location_round_trips() {
    let mut json = serde_json::to_value(uthm()).unwrap();
    json["country"] = serde_json::json!("");
    json["region"] = serde_json::json!("");
    let record: UniversityRecord = serde_json::from_value(json).unwrap();
    assert!(record.validate().is_empty());

    let bytes = SheetExporter::from_records(std::slice::from_ref(&record))
        .to_bytes()
        .unwrap();
    let rows = SheetImporter::from_bytes(bytes).read_rows().unwrap();
    assert_eq!(UniversityRecord::from_row(&rows[0]), record);
}

#[test]
fn test_zero_scores_are_kept() {
    let mut record = uthm();
    record.indicators.insert(
        Indicator::Sustainability,
        IndicatorEntry {
            score: Some(0.0),
            rank: None,
        },
    );
    let bytes = SheetExporter::from_records(std::slice::from_ref(&record))
        .to_bytes()
        .unwrap();

    let rows = SheetImporter::from_bytes(bytes).read_rows().unwrap();
    assert_eq!(rows[0].get(Column::SusScore), Some(&CellValue::Number(0.0)));
    assert_eq!(rows[0].get(Column::SusRank), None);
    assert_eq!(UniversityRecord::from_row(&rows[0]).score(Indicator::Sustainability), Some(0.0));
}

#[test]
fn test_export_to_file_and_import_by_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rankings.xlsx");

    SheetExporter::sample().export(&path).unwrap();
    assert!(path.exists());

    let rows = SheetImporter::new(&path).read_rows().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[9].name().as_deref(), Some("National University of Singapore"));
}

#[test]
fn test_sample_records_parse_long_classification_labels() {
    let bytes = SheetExporter::sample().to_bytes().unwrap();
    let rows = SheetImporter::from_bytes(bytes).read_rows().unwrap();
    let mit = UniversityRecord::from_row(&rows[0]);

    assert_eq!(mit.name, "Massachusetts Institute of Technology");
    assert_eq!(mit.classification.size, Some(Size::M));
    assert_eq!(mit.classification.focus, Some(Focus::FO));
    assert_eq!(mit.classification.research, Some(Research::HI));
    // "Private" alone does not say which private status
    assert_eq!(mit.classification.status, None);
    assert_eq!(mit.overall_score, Some(100.0));
}

// ═══════════════════════════════════════════════════════════════════════════
// LAYOUT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_headers_land_on_row_four() {
    let bytes = SheetExporter::sample().to_bytes().unwrap();
    let mut workbook =
        calamine::open_workbook_auto_from_rs(std::io::Cursor::new(bytes)).unwrap();

    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
    let range = workbook.worksheet_range(SHEET_NAME).unwrap();

    assert_eq!(
        range.get_value((3, 0)),
        Some(&calamine::Data::String("Index".to_string()))
    );
    assert_eq!(
        range.get_value((3, 32)),
        Some(&calamine::Data::String("Rank_Duplicate".to_string()))
    );
    assert_eq!(range.start(), Some((3, 0)));
}

// ═══════════════════════════════════════════════════════════════════════════
// REJECTED WORKBOOKS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_headers_only_is_malformed() {
    let mut rows: Vec<Vec<&str>> = vec![vec![], vec![], vec![]];
    rows.push(Column::all().map(Column::header).collect());

    let result = SheetImporter::from_bytes(workbook_with(&rows)).read_rows();
    assert!(matches!(result, Err(RankError::MalformedFile)));
}

#[test]
fn test_empty_workbook_is_malformed() {
    let result = SheetImporter::from_bytes(workbook_with(&[])).read_rows();
    assert!(matches!(result, Err(RankError::MalformedFile)));
}

#[test]
fn test_formatted_blank_data_row_has_no_valid_rows() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();
    for (c, column) in Column::all().enumerate() {
        sheet.write_string(3, c as u16, column.header()).unwrap();
        sheet.write_blank(4, c as u16, &bold).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let result = SheetImporter::from_bytes(bytes).read_rows();
    assert!(matches!(result, Err(RankError::NoValidRows)));
}

#[test]
fn test_headers_on_first_row_do_not_match() {
    let rows = vec![
        vec!["Name", "Rank"],
        vec!["Harvard University", "4"],
        vec!["Yale University", "16"],
        vec!["Princeton University", "17"],
        vec!["Columbia University", "34"],
    ];
    let result = SheetImporter::from_bytes(workbook_with(&rows)).read_rows();
    assert!(matches!(result, Err(RankError::SchemaMismatch(_))));
}

#[test]
fn test_not_a_workbook() {
    let result = SheetImporter::from_bytes(b"Name,Rank\nMIT,1\n".to_vec()).read_rows();
    assert!(matches!(result, Err(RankError::Import(_))));
}

#[test]
fn test_unknown_headers_are_ignored() {
    let rows = vec![
        vec![],
        vec![],
        vec![],
        vec!["Name", "Motto", "Rank"],
        vec!["Stanford University", "Die Luft der Freiheit weht", "3"],
    ];
    let rows = SheetImporter::from_bytes(workbook_with(&rows))
        .read_rows()
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name().as_deref(), Some("Stanford University"));
    // Text ranks are parsed leniently into the record
    assert_eq!(UniversityRecord::from_row(&rows[0]).rank, Some(3));
    assert_eq!(
        rows[0].get(Column::RankDuplicate),
        Some(&CellValue::Text("3".to_string()))
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// CSV
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_csv_has_one_line_per_form_field() {
    let mut record = uthm();
    record.overall_score = None;
    let csv = record_to_csv(&record).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 16);
    assert_eq!(lines[0], "academic_reputation,10");
    assert_eq!(lines[10], "size,M");
    assert_eq!(lines[13], "status,Public");
    assert_eq!(lines[14], "ranking,1201");
    assert_eq!(lines[15], "overall_score,");
}
