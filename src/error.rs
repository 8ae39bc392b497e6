use thiserror::Error;

use crate::types::FieldError;

pub type RankResult<T> = Result<T, RankError>;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Form input failed validation; nothing was computed or written
    #[error("Validation error: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Excel file must contain headers and at least one data row")]
    MalformedFile,

    #[error("No valid data found in the Excel file")]
    NoValidRows,

    #[error("Header row does not match the interchange layout: {0}")]
    SchemaMismatch(String),

    #[error("Failed to read Excel file: {0}")]
    Import(String),

    #[error("Failed to write Excel file: {0}")]
    Export(String),

    #[error("An import is already in progress")]
    ImportInProgress,

    #[error("No record found for '{0}'")]
    NotFound(String),

    /// Persistence collaborator rejection, message passed through verbatim
    #[error("{0}")]
    Store(String),
}

impl RankError {
    /// True for errors caused by the uploaded file rather than the system
    pub fn is_interchange_error(&self) -> bool {
        matches!(
            self,
            RankError::MalformedFile
                | RankError::NoValidRows
                | RankError::SchemaMismatch(_)
                | RankError::Import(_)
        )
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
