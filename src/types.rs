use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use uuid::Uuid;

use crate::schema::{Column, Indicator};

//==============================================================================
// Raw cells and rows
//==============================================================================

/// A populated spreadsheet cell. Absent cells are `None` at the row level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Build a cell from text; blank text is absent
    pub fn text(s: impl Into<String>) -> Option<CellValue> {
        let s = s.into();
        if s.is_empty() {
            None
        } else {
            Some(CellValue::Text(s))
        }
    }

    /// Numeric view. Text is parsed leniently (`=12.5` reads as 12.5).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().trim_start_matches('=').trim().parse().ok(),
            CellValue::Bool(_) => None,
        }
    }

    /// Rank view: a positive whole number. Banded text ranks such as
    /// `601-650` or `=12` yield their leading integer.
    pub fn as_rank(&self) -> Option<u32> {
        match self {
            CellValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u32)
            }
            CellValue::Number(_) | CellValue::Bool(_) => None,
            CellValue::Text(s) => {
                let digits: String = s
                    .trim()
                    .trim_start_matches('=')
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            }
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// One interchange row keyed by known column. Missing columns read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetRow {
    cells: BTreeMap<Column, Option<CellValue>>,
}

impl Default for SheetRow {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetRow {
    /// Row with every column present and empty
    pub fn new() -> Self {
        Self {
            cells: Column::all().map(|c| (c, None)).collect(),
        }
    }

    pub fn get(&self, column: Column) -> Option<&CellValue> {
        self.cells.get(&column).and_then(Option::as_ref)
    }

    pub fn set(&mut self, column: Column, value: Option<CellValue>) {
        self.cells.insert(column, value);
    }

    pub fn with(mut self, column: Column, value: Option<CellValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Option::is_none)
    }

    /// Cells in interchange column order
    pub fn iter(&self) -> impl Iterator<Item = (Column, Option<&CellValue>)> + '_ {
        Column::all().map(move |c| (c, self.get(c)))
    }

    /// Value of the `Name` column, if present
    pub fn name(&self) -> Option<String> {
        self.get(Column::Name).map(CellValue::as_text)
    }
}

//==============================================================================
// Store payloads
//==============================================================================

/// Opaque authenticated-user identifier attached to every insert
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertPayload {
    pub user_id: UserId,
    pub row: SheetRow,
}

/// A row as accepted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub row: SheetRow,
}

impl StoredRow {
    pub fn accept(payload: InsertPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            user_id: payload.user_id,
            row: payload.row,
        }
    }
}

//==============================================================================
// Validation
//==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

//==============================================================================
// Classification
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    S,
    M,
    L,
    XL,
}

impl Size {
    pub fn code(self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "s" | "small" => Some(Size::S),
            "m" | "medium" => Some(Size::M),
            "l" | "large" => Some(Size::L),
            "xl" | "extra large" | "very large" => Some(Size::XL),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Focus {
    CO,
    FC,
    FO,
    SP,
}

impl Focus {
    pub fn code(self) -> &'static str {
        match self {
            Focus::CO => "CO",
            Focus::FC => "FC",
            Focus::FO => "FO",
            Focus::SP => "SP",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "co" | "comprehensive" => Some(Focus::CO),
            "fc" | "full comprehensive" => Some(Focus::FC),
            "fo" | "focused" => Some(Focus::FO),
            "sp" | "specialist" => Some(Focus::SP),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Research {
    HI,
    LO,
    ND,
    VH,
}

impl Research {
    pub fn code(self) -> &'static str {
        match self {
            Research::HI => "HI",
            Research::LO => "LO",
            Research::ND => "ND",
            Research::VH => "VH",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "hi" | "high" | "high research" => Some(Research::HI),
            "lo" | "low" | "low research" => Some(Research::LO),
            "nd" | "no data" => Some(Research::ND),
            "vh" | "very high" | "very high research" => Some(Research::VH),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Public,
    #[serde(rename = "Private for Profit")]
    PrivateForProfit,
    #[serde(rename = "Private for Non-Profit")]
    PrivateNonProfit,
}

impl Status {
    pub fn code(self) -> &'static str {
        match self {
            Status::Public => "Public",
            Status::PrivateForProfit => "Private for Profit",
            Status::PrivateNonProfit => "Private for Non-Profit",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "public" => Some(Status::Public),
            "private for profit" => Some(Status::PrivateForProfit),
            "private for non-profit" | "private not for profit" => Some(Status::PrivateNonProfit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub size: Option<Size>,
    pub focus: Option<Focus>,
    pub research: Option<Research>,
    pub status: Option<Status>,
}

//==============================================================================
// University record
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub score: Option<f64>,
    pub rank: Option<u32>,
}

/// The canonical per-institution record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UniversityRecord {
    pub index: Option<u32>,
    pub rank: Option<u32>,
    pub previous_rank: Option<u32>,
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub indicators: BTreeMap<Indicator, IndicatorEntry>,
    pub overall_score: Option<f64>,
}

/// Empty form text means "not given", the same as a blank cell
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn check_bounded(field: &str, value: Option<f64>, errors: &mut Vec<FieldError>) {
    match value {
        None => errors.push(FieldError::new(field, "Required")),
        Some(v) if !(0.0..=100.0).contains(&v) => {
            errors.push(FieldError::new(field, "Must be between 0 and 100"))
        }
        Some(_) => {}
    }
}

fn classify<T>(row: &SheetRow, column: Column, parse: fn(&str) -> Option<T>) -> Option<T> {
    let raw = row.get(column)?.as_text();
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!(column = %column, value = %raw, "unrecognised classification value");
    }
    parsed
}

impl UniversityRecord {
    pub fn score(&self, indicator: Indicator) -> Option<f64> {
        self.indicators.get(&indicator).and_then(|e| e.score)
    }

    /// Form-level validation (every indicator, classification and rank
    /// is required; overall score is optional but bounded)
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Required"));
        }

        for (field, value) in [("country", &self.country), ("region", &self.region)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                errors.push(FieldError::new(field, "Must not be blank"));
            }
        }

        for indicator in Indicator::ALL {
            check_bounded(indicator.field_name(), self.score(indicator), &mut errors);
        }

        let c = &self.classification;
        for (field, present) in [
            ("size", c.size.is_some()),
            ("focus", c.focus.is_some()),
            ("research", c.research.is_some()),
            ("status", c.status.is_some()),
        ] {
            if !present {
                errors.push(FieldError::new(field, "Required"));
            }
        }

        match self.rank {
            None => errors.push(FieldError::new("ranking", "Required")),
            Some(0) => errors.push(FieldError::new("ranking", "Must be at least 1")),
            Some(_) => {}
        }

        if self.overall_score.is_some() {
            check_bounded("overall_score", self.overall_score, &mut errors);
        }

        errors
    }

    /// Project the record onto the interchange row. `Column2` and
    /// `Rank_Duplicate` mirror the overall score and rank.
    pub fn to_row(&self) -> SheetRow {
        let number = |v: Option<f64>| v.map(CellValue::Number);
        let whole = |v: Option<u32>| v.map(|n| CellValue::Number(f64::from(n)));
        let text = |v: Option<&str>| v.and_then(CellValue::text);
        let c = &self.classification;

        let mut row = SheetRow::new()
            .with(Column::Index, whole(self.index))
            .with(Column::Rank, whole(self.rank))
            .with(Column::PreviousRank, whole(self.previous_rank))
            .with(Column::Name, CellValue::text(self.name.clone()))
            .with(Column::Country, text(self.country.as_deref()))
            .with(Column::Region, text(self.region.as_deref()))
            .with(Column::Size, text(c.size.map(Size::code)))
            .with(Column::Focus, text(c.focus.map(Focus::code)))
            .with(Column::Research, text(c.research.map(Research::code)))
            .with(Column::Status, text(c.status.map(Status::code)))
            .with(Column::OverallScore, number(self.overall_score))
            .with(Column::Column2, number(self.overall_score))
            .with(Column::RankDuplicate, whole(self.rank));

        for (indicator, entry) in &self.indicators {
            row.set(indicator.score_column(), number(entry.score));
            row.set(indicator.rank_column(), whole(entry.rank));
        }
        row
    }

    /// Build a record from an interchange row. Indicators with neither a
    /// score nor a rank are left out.
    pub fn from_row(row: &SheetRow) -> Self {
        let number = |c: Column| row.get(c).and_then(CellValue::as_f64);
        let whole = |c: Column| row.get(c).and_then(CellValue::as_rank);
        let text = |c: Column| row.get(c).map(CellValue::as_text);

        let classification = Classification {
            size: classify(row, Column::Size, Size::parse),
            focus: classify(row, Column::Focus, Focus::parse),
            research: classify(row, Column::Research, Research::parse),
            status: classify(row, Column::Status, Status::parse),
        };

        let indicators = Indicator::ALL
            .iter()
            .filter_map(|&indicator| {
                let entry = IndicatorEntry {
                    score: number(indicator.score_column()),
                    rank: whole(indicator.rank_column()),
                };
                (entry.score.is_some() || entry.rank.is_some()).then_some((indicator, entry))
            })
            .collect();

        Self {
            index: whole(Column::Index),
            rank: whole(Column::Rank).or_else(|| whole(Column::RankDuplicate)),
            previous_rank: whole(Column::PreviousRank),
            name: text(Column::Name).unwrap_or_default(),
            country: text(Column::Country),
            region: text(Column::Region),
            classification,
            indicators,
            overall_score: number(Column::OverallScore).or_else(|| number(Column::Column2)),
        }
    }
}
