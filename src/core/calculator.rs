//! Ratio calculators for the three indicator families
//!
//! Each family turns two headcounts into a `{ratio, percentage, score}`
//! triple. Results are pure projections of the inputs and are rebuilt on
//! every change; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::types::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorFamily {
    FacultyStudent,
    InternationalFaculty,
    InternationalStudent,
}

impl IndicatorFamily {
    pub fn code(self) -> &'static str {
        match self {
            IndicatorFamily::FacultyStudent => "FSR",
            IndicatorFamily::InternationalFaculty => "IFR",
            IndicatorFamily::InternationalStudent => "ISR",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            IndicatorFamily::FacultyStudent => "Faculty-Student Ratio",
            IndicatorFamily::InternationalFaculty => "International Faculty Ratio",
            IndicatorFamily::InternationalStudent => "International Student Ratio",
        }
    }

    /// Decimal places kept on the ratio
    pub fn ratio_places(self) -> i32 {
        match self {
            IndicatorFamily::FacultyStudent => 2,
            IndicatorFamily::InternationalFaculty | IndicatorFamily::InternationalStudent => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub ratio: f64,
    pub percentage: f64,
    pub score: f64,
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Present, finite value
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn require_positive(field: &str, value: Option<f64>, errors: &mut Vec<FieldError>) {
    match present(value) {
        None => errors.push(FieldError::new(field, "Required")),
        Some(v) if v < 1.0 => errors.push(FieldError::new(field, "Must be at least 1")),
        Some(_) => {}
    }
}

fn require_non_negative(field: &str, value: Option<f64>, errors: &mut Vec<FieldError>) {
    match present(value) {
        None => errors.push(FieldError::new(field, "Required")),
        Some(v) if v < 0.0 => errors.push(FieldError::new(field, "Cannot be negative")),
        Some(_) => {}
    }
}

/// Form input for one indicator family
pub trait IndicatorInput: Clone + Default + Send + Sync + 'static {
    const FAMILY: IndicatorFamily;

    /// Field-level messages for the form
    fn validate(&self) -> Vec<FieldError>;

    /// `None` when inputs are missing, a denominator is not positive, or a
    /// business rule (subset of total) is violated
    fn calculate(&self) -> Option<CalculationResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FsrInput {
    pub total_academic_staff: Option<f64>,
    pub total_students: Option<f64>,
}

impl FsrInput {
    pub fn new(staff: f64, students: f64) -> Self {
        Self {
            total_academic_staff: Some(staff),
            total_students: Some(students),
        }
    }
}

impl IndicatorInput for FsrInput {
    const FAMILY: IndicatorFamily = IndicatorFamily::FacultyStudent;

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_positive("total_academic_staff", self.total_academic_staff, &mut errors);
        require_positive("total_students", self.total_students, &mut errors);
        errors
    }

    fn calculate(&self) -> Option<CalculationResult> {
        let staff = present(self.total_academic_staff).filter(|v| *v > 0.0)?;
        let students = present(self.total_students).filter(|v| *v > 0.0)?;

        let ratio = students / staff;
        let percentage = staff / students * 100.0;
        // Lower students-per-staff is better; 20:1 scores full marks
        let score = clamp_score(20.0 / ratio * 100.0);

        Some(CalculationResult {
            ratio: round_to(ratio, Self::FAMILY.ratio_places()),
            percentage: round_to(percentage, 2),
            score: round_to(score, 2),
        })
    }
}

/// Shared law for the two internationalisation families
fn international_share(
    part: Option<f64>,
    total: Option<f64>,
    multiplier: f64,
    family: IndicatorFamily,
) -> Option<CalculationResult> {
    let part = present(part).filter(|v| *v >= 0.0)?;
    let total = present(total).filter(|v| *v > 0.0)?;
    if part > total {
        return None;
    }

    let ratio = part / total;
    let percentage = ratio * 100.0;
    let score = clamp_score(percentage * multiplier);

    Some(CalculationResult {
        ratio: round_to(ratio, family.ratio_places()),
        percentage: round_to(percentage, 2),
        score: round_to(score, 2),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IfrInput {
    pub international_staff: Option<f64>,
    pub total_academic_staff: Option<f64>,
}

impl IfrInput {
    pub fn new(international_staff: f64, total_academic_staff: f64) -> Self {
        Self {
            international_staff: Some(international_staff),
            total_academic_staff: Some(total_academic_staff),
        }
    }
}

impl IndicatorInput for IfrInput {
    const FAMILY: IndicatorFamily = IndicatorFamily::InternationalFaculty;

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_non_negative("international_staff", self.international_staff, &mut errors);
        require_positive("total_academic_staff", self.total_academic_staff, &mut errors);
        if let (Some(part), Some(total)) = (
            present(self.international_staff),
            present(self.total_academic_staff),
        ) {
            if part > total {
                errors.push(FieldError::new(
                    "international_staff",
                    "International staff cannot exceed total academic staff",
                ));
            }
        }
        errors
    }

    fn calculate(&self) -> Option<CalculationResult> {
        international_share(
            self.international_staff,
            self.total_academic_staff,
            2.0,
            Self::FAMILY,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IsrInput {
    pub international_students: Option<f64>,
    pub total_students: Option<f64>,
}

impl IsrInput {
    pub fn new(international_students: f64, total_students: f64) -> Self {
        Self {
            international_students: Some(international_students),
            total_students: Some(total_students),
        }
    }
}

impl IndicatorInput for IsrInput {
    const FAMILY: IndicatorFamily = IndicatorFamily::InternationalStudent;

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_non_negative(
            "international_students",
            self.international_students,
            &mut errors,
        );
        require_positive("total_students", self.total_students, &mut errors);
        if let (Some(part), Some(total)) = (
            present(self.international_students),
            present(self.total_students),
        ) {
            if part > total {
                errors.push(FieldError::new(
                    "international_students",
                    "International students cannot exceed total students",
                ));
            }
        }
        errors
    }

    fn calculate(&self) -> Option<CalculationResult> {
        international_share(
            self.international_students,
            self.total_students,
            3.0,
            Self::FAMILY,
        )
    }
}
