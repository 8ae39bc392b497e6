//! Demonstration rows for the onboarding workbook. Literal reference data,
//! not derived from any calculation.

use crate::schema::{Column, Indicator};
use crate::types::{CellValue, SheetRow};

struct SampleUniversity {
    index: u32,
    rank: u32,
    previous_rank: u32,
    name: &'static str,
    country: &'static str,
    region: &'static str,
    size: &'static str,
    focus: &'static str,
    research: &'static str,
    status: &'static str,
    /// (score, rank) in `Indicator::ALL` order
    indicators: [(f64, u32); 10],
    overall: f64,
}

const SAMPLES: [SampleUniversity; 10] = [
    SampleUniversity {
        index: 1,
        rank: 1,
        previous_rank: 1,
        name: "Massachusetts Institute of Technology",
        country: "United States",
        region: "North America",
        size: "Medium",
        focus: "Focused",
        research: "High Research",
        status: "Private",
        indicators: [
            (100.0, 1),
            (100.0, 1),
            (100.0, 1),
            (100.0, 1),
            (95.2, 5),
            (90.1, 8),
            (88.5, 12),
            (92.3, 3),
            (85.7, 15),
            (78.9, 25),
        ],
        overall: 100.0,
    },
    SampleUniversity {
        index: 2,
        rank: 2,
        previous_rank: 3,
        name: "University of Cambridge",
        country: "United Kingdom",
        region: "Europe",
        size: "Large",
        focus: "Comprehensive",
        research: "High Research",
        status: "Public",
        indicators: [
            (99.2, 2),
            (99.8, 2),
            (98.5, 3),
            (99.1, 2),
            (98.7, 1),
            (95.3, 2),
            (91.2, 8),
            (95.8, 1),
            (88.4, 8),
            (82.1, 18),
        ],
        overall: 99.2,
    },
    SampleUniversity {
        index: 3,
        rank: 3,
        previous_rank: 2,
        name: "Stanford University",
        country: "United States",
        region: "North America",
        size: "Large",
        focus: "Comprehensive",
        research: "High Research",
        status: "Private",
        indicators: [
            (98.9, 3),
            (99.5, 3),
            (97.8, 4),
            (98.7, 3),
            (92.1, 8),
            (88.9, 12),
            (89.7, 10),
            (94.2, 2),
            (87.3, 10),
            (80.5, 20),
        ],
        overall: 98.9,
    },
    SampleUniversity {
        index: 4,
        rank: 4,
        previous_rank: 4,
        name: "University of Oxford",
        country: "United Kingdom",
        region: "Europe",
        size: "Large",
        focus: "Comprehensive",
        research: "High Research",
        status: "Public",
        indicators: [
            (98.5, 4),
            (99.1, 4),
            (99.2, 2),
            (97.9, 4),
            (97.8, 2),
            (94.7, 3),
            (90.8, 9),
            (93.5, 4),
            (86.9, 12),
            (81.7, 19),
        ],
        overall: 98.5,
    },
    SampleUniversity {
        index: 5,
        rank: 5,
        previous_rank: 5,
        name: "Harvard University",
        country: "United States",
        region: "North America",
        size: "Large",
        focus: "Comprehensive",
        research: "High Research",
        status: "Private",
        indicators: [
            (98.1, 5),
            (98.7, 5),
            (96.3, 6),
            (97.2, 5),
            (89.4, 15),
            (87.2, 18),
            (88.1, 14),
            (91.8, 6),
            (84.6, 18),
            (79.3, 23),
        ],
        overall: 98.1,
    },
    SampleUniversity {
        index: 6,
        rank: 6,
        previous_rank: 6,
        name: "Imperial College London",
        country: "United Kingdom",
        region: "Europe",
        size: "Medium",
        focus: "Focused",
        research: "High Research",
        status: "Public",
        indicators: [
            (97.8, 6),
            (98.3, 6),
            (95.7, 8),
            (96.8, 6),
            (96.5, 3),
            (93.1, 4),
            (87.9, 15),
            (90.7, 8),
            (83.2, 22),
            (78.8, 24),
        ],
        overall: 97.8,
    },
    SampleUniversity {
        index: 7,
        rank: 7,
        previous_rank: 7,
        name: "UCL",
        country: "United Kingdom",
        region: "Europe",
        size: "Large",
        focus: "Comprehensive",
        research: "High Research",
        status: "Public",
        indicators: [
            (97.2, 7),
            (97.9, 7),
            (94.8, 12),
            (96.1, 7),
            (95.8, 4),
            (92.6, 5),
            (86.7, 18),
            (89.9, 9),
            (82.5, 24),
            (77.9, 26),
        ],
        overall: 97.2,
    },
    SampleUniversity {
        index: 8,
        rank: 8,
        previous_rank: 8,
        name: "ETH Zurich",
        country: "Switzerland",
        region: "Europe",
        size: "Medium",
        focus: "Focused",
        research: "High Research",
        status: "Public",
        indicators: [
            (96.9, 8),
            (97.5, 8),
            (96.8, 5),
            (95.7, 8),
            (94.2, 6),
            (91.8, 6),
            (85.3, 22),
            (88.4, 11),
            (81.7, 26),
            (76.5, 28),
        ],
        overall: 96.9,
    },
    SampleUniversity {
        index: 9,
        rank: 9,
        previous_rank: 10,
        name: "University of Chicago",
        country: "United States",
        region: "North America",
        size: "Medium",
        focus: "Comprehensive",
        research: "High Research",
        status: "Private",
        indicators: [
            (96.5, 9),
            (97.1, 9),
            (95.2, 10),
            (95.3, 9),
            (88.7, 18),
            (86.9, 19),
            (84.8, 24),
            (87.6, 12),
            (80.9, 28),
            (75.8, 30),
        ],
        overall: 96.5,
    },
    SampleUniversity {
        index: 10,
        rank: 10,
        previous_rank: 9,
        name: "National University of Singapore",
        country: "Singapore",
        region: "Asia",
        size: "Large",
        focus: "Comprehensive",
        research: "High Research",
        status: "Public",
        indicators: [
            (96.1, 10),
            (96.7, 10),
            (94.5, 13),
            (94.9, 10),
            (93.6, 7),
            (90.4, 7),
            (83.2, 28),
            (86.8, 13),
            (79.4, 30),
            (74.2, 35),
        ],
        overall: 96.1,
    },
];

fn whole(n: u32) -> Option<CellValue> {
    Some(CellValue::Number(f64::from(n)))
}

impl SampleUniversity {
    fn to_row(&self) -> SheetRow {
        let mut row = SheetRow::new()
            .with(Column::Index, whole(self.index))
            .with(Column::Rank, whole(self.rank))
            .with(Column::PreviousRank, whole(self.previous_rank))
            .with(Column::Name, CellValue::text(self.name))
            .with(Column::Country, CellValue::text(self.country))
            .with(Column::Region, CellValue::text(self.region))
            .with(Column::Size, CellValue::text(self.size))
            .with(Column::Focus, CellValue::text(self.focus))
            .with(Column::Research, CellValue::text(self.research))
            .with(Column::Status, CellValue::text(self.status))
            .with(Column::OverallScore, Some(CellValue::Number(self.overall)))
            // Column2 is left blank in the demonstration sheet
            .with(Column::RankDuplicate, whole(self.rank));

        for (indicator, (score, rank)) in Indicator::ALL.iter().zip(self.indicators) {
            row.set(indicator.score_column(), Some(CellValue::Number(score)));
            row.set(indicator.rank_column(), whole(rank));
        }
        row
    }
}

pub fn sample_rows() -> Vec<SheetRow> {
    SAMPLES.iter().map(SampleUniversity::to_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_sample_rows() {
        let rows = sample_rows();
        assert_eq!(rows.len(), 10);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.get(Column::Index), whole(i as u32 + 1).as_ref());
            assert_eq!(row.get(Column::Rank), row.get(Column::RankDuplicate));
            assert_eq!(row.get(Column::Column2), None);
        }
    }

    #[test]
    fn test_sample_indicator_pairs() {
        let rows = sample_rows();
        let cambridge = &rows[1];
        assert_eq!(cambridge.get(Column::IfrScore), Some(&CellValue::Number(98.7)));
        assert_eq!(cambridge.get(Column::IfrRank), Some(&CellValue::Number(1.0)));
        assert_eq!(cambridge.get(Column::SusRank), Some(&CellValue::Number(18.0)));
    }
}
