//! Interchange column table
//!
//! `COLUMNS` is the single ordered source for both directions: the importer
//! resolves header text through it and the exporter writes its header row
//! from it. Adding a column means adding one entry here.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Zero-indexed sheet row holding the headers (row 4 in Excel terms)
pub const HEADER_ROW: u32 = 3;

/// Worksheet name used by the exporter
pub const SHEET_NAME: &str = "University Rankings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Index,
    Rank,
    PreviousRank,
    Name,
    Country,
    Region,
    Size,
    Focus,
    Research,
    Status,
    ArScore,
    ArRank,
    ErScore,
    ErRank,
    FsrScore,
    FsrRank,
    CpfScore,
    CpfRank,
    IfrScore,
    IfrRank,
    IsrScore,
    IsrRank,
    IsdScore,
    IsdRank,
    IrnScore,
    IrnRank,
    EoScore,
    EoRank,
    SusScore,
    SusRank,
    OverallScore,
    Column2,
    RankDuplicate,
}

/// One entry of the mapping table
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub column: Column,
    pub header: &'static str,
    /// Export column width in characters
    pub width: f64,
}

const fn spec(column: Column, header: &'static str, width: f64) -> ColumnSpec {
    ColumnSpec {
        column,
        header,
        width,
    }
}

pub const COLUMNS: [ColumnSpec; 33] = [
    spec(Column::Index, "Index", 8.0),
    spec(Column::Rank, "Rank", 8.0),
    spec(Column::PreviousRank, "Previous Rank", 12.0),
    spec(Column::Name, "Name", 35.0),
    spec(Column::Country, "Country/Territory", 18.0),
    spec(Column::Region, "Region", 15.0),
    spec(Column::Size, "Size", 10.0),
    spec(Column::Focus, "Focus", 15.0),
    spec(Column::Research, "Research", 15.0),
    spec(Column::Status, "Status", 12.0),
    spec(Column::ArScore, "AR SCORE", 10.0),
    spec(Column::ArRank, "AR RANK", 10.0),
    spec(Column::ErScore, "ER SCORE", 10.0),
    spec(Column::ErRank, "ER RANK", 10.0),
    spec(Column::FsrScore, "FSR SCORE", 10.0),
    spec(Column::FsrRank, "FSR RANK", 10.0),
    spec(Column::CpfScore, "CPF SCORE", 10.0),
    spec(Column::CpfRank, "CPF RANK", 10.0),
    spec(Column::IfrScore, "IFR SCORE", 10.0),
    spec(Column::IfrRank, "IFR RANK", 10.0),
    spec(Column::IsrScore, "ISR SCORE", 10.0),
    spec(Column::IsrRank, "ISR RANK", 10.0),
    spec(Column::IsdScore, "ISD SCORE", 10.0),
    spec(Column::IsdRank, "ISD RANK", 10.0),
    spec(Column::IrnScore, "IRN SCORE", 10.0),
    spec(Column::IrnRank, "IRN RANK", 10.0),
    spec(Column::EoScore, "EO SCORE", 10.0),
    spec(Column::EoRank, "EO RANK", 10.0),
    spec(Column::SusScore, "SUS SCORE", 10.0),
    spec(Column::SusRank, "SUS RANK", 10.0),
    spec(Column::OverallScore, "Overall SCORE", 12.0),
    spec(Column::Column2, "Column2", 10.0),
    spec(Column::RankDuplicate, "Rank_Duplicate", 8.0),
];

impl Column {
    /// Position in the interchange header row
    pub fn position(self) -> usize {
        COLUMNS
            .iter()
            .position(|c| c.column == self)
            .unwrap_or_default()
    }

    pub fn header(self) -> &'static str {
        COLUMNS[self.position()].header
    }

    pub fn width(self) -> f64 {
        COLUMNS[self.position()].width
    }

    /// Resolve header text to a column (surrounding whitespace ignored)
    pub fn from_header(text: &str) -> Option<Column> {
        let text = text.trim();
        COLUMNS.iter().find(|c| c.header == text).map(|c| c.column)
    }

    pub fn all() -> impl Iterator<Item = Column> {
        COLUMNS.iter().map(|c| c.column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.header())
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let header = String::deserialize(deserializer)?;
        Column::from_header(&header)
            .ok_or_else(|| de::Error::custom(format!("unknown column header '{header}'")))
    }
}

/// The ten ranking indicators, each carried as a SCORE/RANK column pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    AcademicReputation,
    EmployerReputation,
    FacultyStudentRatio,
    CitationsPerFaculty,
    InternationalFaculty,
    InternationalStudents,
    InternationalStudentsDiversity,
    InternationalResearchNetwork,
    EmploymentOutcomes,
    Sustainability,
}

impl Indicator {
    pub const ALL: [Indicator; 10] = [
        Indicator::AcademicReputation,
        Indicator::EmployerReputation,
        Indicator::FacultyStudentRatio,
        Indicator::CitationsPerFaculty,
        Indicator::InternationalFaculty,
        Indicator::InternationalStudents,
        Indicator::InternationalStudentsDiversity,
        Indicator::InternationalResearchNetwork,
        Indicator::EmploymentOutcomes,
        Indicator::Sustainability,
    ];

    /// Short code used in the spreadsheet headers
    pub fn code(self) -> &'static str {
        match self {
            Indicator::AcademicReputation => "AR",
            Indicator::EmployerReputation => "ER",
            Indicator::FacultyStudentRatio => "FSR",
            Indicator::CitationsPerFaculty => "CPF",
            Indicator::InternationalFaculty => "IFR",
            Indicator::InternationalStudents => "ISR",
            Indicator::InternationalStudentsDiversity => "ISD",
            Indicator::InternationalResearchNetwork => "IRN",
            Indicator::EmploymentOutcomes => "EO",
            Indicator::Sustainability => "SUS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::AcademicReputation => "Academic Reputation",
            Indicator::EmployerReputation => "Employer Reputation",
            Indicator::FacultyStudentRatio => "Faculty Student Ratio",
            Indicator::CitationsPerFaculty => "Citations Per Faculty",
            Indicator::InternationalFaculty => "International Faculty",
            Indicator::InternationalStudents => "International Students",
            Indicator::InternationalStudentsDiversity => "International Students Diversity",
            Indicator::InternationalResearchNetwork => "International Research Network",
            Indicator::EmploymentOutcomes => "Employment Outcomes",
            Indicator::Sustainability => "Sustainability",
        }
    }

    /// Form field name, as used by the flat CSV export
    pub fn field_name(self) -> &'static str {
        match self {
            Indicator::AcademicReputation => "academic_reputation",
            Indicator::EmployerReputation => "employer_reputation",
            Indicator::FacultyStudentRatio => "faculty_student_ratio",
            Indicator::CitationsPerFaculty => "citations_per_faculty",
            Indicator::InternationalFaculty => "international_faculty",
            Indicator::InternationalStudents => "international_students",
            Indicator::InternationalStudentsDiversity => "international_students_diversity",
            Indicator::InternationalResearchNetwork => "international_research_network",
            Indicator::EmploymentOutcomes => "employment_outcomes",
            Indicator::Sustainability => "sustainability",
        }
    }

    pub fn score_column(self) -> Column {
        match self {
            Indicator::AcademicReputation => Column::ArScore,
            Indicator::EmployerReputation => Column::ErScore,
            Indicator::FacultyStudentRatio => Column::FsrScore,
            Indicator::CitationsPerFaculty => Column::CpfScore,
            Indicator::InternationalFaculty => Column::IfrScore,
            Indicator::InternationalStudents => Column::IsrScore,
            Indicator::InternationalStudentsDiversity => Column::IsdScore,
            Indicator::InternationalResearchNetwork => Column::IrnScore,
            Indicator::EmploymentOutcomes => Column::EoScore,
            Indicator::Sustainability => Column::SusScore,
        }
    }

    pub fn rank_column(self) -> Column {
        match self {
            Indicator::AcademicReputation => Column::ArRank,
            Indicator::EmployerReputation => Column::ErRank,
            Indicator::FacultyStudentRatio => Column::FsrRank,
            Indicator::CitationsPerFaculty => Column::CpfRank,
            Indicator::InternationalFaculty => Column::IfrRank,
            Indicator::InternationalStudents => Column::IsrRank,
            Indicator::InternationalStudentsDiversity => Column::IsdRank,
            Indicator::InternationalResearchNetwork => Column::IrnRank,
            Indicator::EmploymentOutcomes => Column::EoRank,
            Indicator::Sustainability => Column::SusRank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_headers_unique_and_resolvable() {
        let mut seen = HashSet::new();
        for spec in COLUMNS.iter() {
            assert!(seen.insert(spec.header), "duplicate header {}", spec.header);
            assert_eq!(Column::from_header(spec.header), Some(spec.column));
            assert_eq!(spec.column.header(), spec.header);
        }
        assert_eq!(seen.len(), 33);
    }

    #[test]
    fn test_from_header_trims_and_rejects_unknown() {
        assert_eq!(Column::from_header("  AR SCORE "), Some(Column::ArScore));
        assert_eq!(Column::from_header("ar score"), None);
        assert_eq!(Column::from_header("Notes"), None);
    }

    #[test]
    fn test_positions_follow_table_order() {
        assert_eq!(Column::Index.position(), 0);
        assert_eq!(Column::Name.position(), 3);
        assert_eq!(Column::ArScore.position(), 10);
        assert_eq!(Column::RankDuplicate.position(), 32);
    }

    #[test]
    fn test_every_indicator_pair_is_in_table() {
        for indicator in Indicator::ALL {
            let score = indicator.score_column();
            let rank = indicator.rank_column();
            assert_eq!(score.header(), format!("{} SCORE", indicator.code()));
            assert_eq!(rank.header(), format!("{} RANK", indicator.code()));
            assert_eq!(rank.position(), score.position() + 1);
        }
    }

    #[test]
    fn test_column_serializes_as_header() {
        let json = serde_json::to_string(&Column::Country).unwrap();
        assert_eq!(json, "\"Country/Territory\"");
        let back: Column = serde_json::from_str("\"Rank_Duplicate\"").unwrap();
        assert_eq!(back, Column::RankDuplicate);
        assert!(serde_json::from_str::<Column>("\"Bogus\"").is_err());
    }
}
