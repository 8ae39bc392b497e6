//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::core::{FormState, IndicatorInput};
use crate::error::RankError;
use crate::excel::{record_to_csv, SheetExporter, CSV_MIME, XLSX_MIME};
use crate::records::{load_named_record, submit_record};
use crate::types::{FieldError, UniversityRecord, UserId};

use super::server::AppState;

/// Header carrying the authenticated user on write requests
pub const USER_HEADER: &str = "x-user-id";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data,
            error: Some(message.into()),
        }
    }
}

/// A `RankError` rendered as a status code plus the JSON envelope
pub struct ApiError(pub RankError);

impl From<RankError> for ApiError {
    fn from(e: RankError) -> Self {
        Self(e)
    }
}

pub fn status_for(error: &RankError) -> StatusCode {
    match error {
        RankError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RankError::NotFound(_) => StatusCode::NOT_FOUND,
        RankError::ImportInProgress => StatusCode::CONFLICT,
        RankError::Store(_) => StatusCode::BAD_GATEWAY,
        RankError::Json(_) | RankError::Yaml(_) => StatusCode::BAD_REQUEST,
        e if e.is_interchange_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self.0, "request failed");
        }

        let message = self.0.to_string();
        let fields = match self.0 {
            RankError::Validation(errors) => Some(errors),
            _ => None,
        };
        (status, Json(ApiResponse::<Vec<FieldError>>::err(message, fields))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn user_from_headers(headers: &HeaderMap) -> ApiResult<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(UserId::new)
        .ok_or_else(|| {
            ApiError(RankError::Validation(vec![FieldError::new(
                USER_HEADER,
                "Required",
            )]))
        })
}

fn attachment(mime: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "UniRank API Server".to_string(),
        version: state.version.clone(),
        description: "University ranking indicator calculators and Excel interchange".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("POST", "/api/v1/calculate/fsr", "Faculty/Student ratio"),
            EndpointInfo::new("POST", "/api/v1/calculate/ifr", "International Faculty ratio"),
            EndpointInfo::new("POST", "/api/v1/calculate/isr", "International Student ratio"),
            EndpointInfo::new("POST", "/api/v1/import", "Import an Excel workbook"),
            EndpointInfo::new("GET", "/api/v1/sample", "Download the sample workbook"),
            EndpointInfo::new("POST", "/api/v1/records", "Validate and store a record"),
            EndpointInfo::new("GET", "/api/v1/records/:name", "Latest record for a university"),
            EndpointInfo::new("GET", "/api/v1/records/:name/xlsx", "Record as Excel"),
            EndpointInfo::new("GET", "/api/v1/records/:name/csv", "Record as CSV"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub import_in_progress: bool,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        import_in_progress: state.importer.is_busy(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["fsr", "ifr", "isr", "import", "sample", "records", "xlsx", "csv"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// POST /api/v1/calculate/{fsr,ifr,isr} - Evaluate one indicator form
///
/// A result with advisory errors (e.g. fractional staff count) is still a
/// 200; only a suppressed result is reported as 422.
pub async fn calculate<I>(Json(input): Json<I>) -> ApiResult<Json<ApiResponse<FormState>>>
where
    I: IndicatorInput + DeserializeOwned,
{
    let state = FormState::evaluate(&input);
    if state.result.is_none() && !state.errors.is_empty() {
        return Err(RankError::Validation(state.errors).into());
    }
    Ok(Json(ApiResponse::ok(state)))
}

/// Import response
#[derive(Serialize)]
pub struct ImportResponse {
    pub parsed: usize,
    pub inserted: usize,
    pub message: String,
}

/// POST /api/v1/import - Import a workbook sent as the raw request body
pub async fn import_excel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<ImportResponse>>> {
    let user = user_from_headers(&headers)?;
    let outcome = state.importer.import_bytes(&user, body.to_vec()).await?;

    Ok(Json(ApiResponse::ok(ImportResponse {
        parsed: outcome.parsed,
        inserted: outcome.inserted,
        message: format!(
            "Successfully imported {} records to the database.",
            outcome.inserted
        ),
    })))
}

/// GET /api/v1/sample - Download the demonstration workbook
pub async fn sample() -> ApiResult<Response> {
    let bytes = SheetExporter::sample().to_bytes()?;
    Ok(attachment(XLSX_MIME, "university_rankings_sample.xlsx", bytes))
}

/// Submit response
#[derive(Serialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub name: String,
}

/// POST /api/v1/records - Validate a form record and store it
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(record): Json<UniversityRecord>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SubmitResponse>>)> {
    let user = user_from_headers(&headers)?;
    let stored = submit_record(state.store.as_ref(), &user, &record).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SubmitResponse {
            id: stored.id,
            name: record.name,
        })),
    ))
}

/// Query string for record lookups
#[derive(Deserialize)]
pub struct RecordQuery {
    pub user_id: String,
}

async fn lookup(state: &AppState, name: &str, query: RecordQuery) -> ApiResult<UniversityRecord> {
    let user = UserId::new(query.user_id);
    Ok(load_named_record(state.store.as_ref(), &user, name).await?)
}

/// GET /api/v1/records/:name - Latest stored record for a university
pub async fn record(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<RecordQuery>,
) -> ApiResult<Json<ApiResponse<UniversityRecord>>> {
    let record = lookup(&state, &name, query).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// GET /api/v1/records/:name/xlsx - Record as a one-row interchange workbook
pub async fn record_xlsx(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<RecordQuery>,
) -> ApiResult<Response> {
    let record = lookup(&state, &name, query).await?;
    let bytes = SheetExporter::from_records(std::slice::from_ref(&record)).to_bytes()?;
    Ok(attachment(XLSX_MIME, "university-data.xlsx", bytes))
}

/// GET /api/v1/records/:name/csv - Record as flat field,value CSV
pub async fn record_csv(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<RecordQuery>,
) -> ApiResult<Response> {
    let record = lookup(&state, &name, query).await?;
    let csv = record_to_csv(&record)?;
    Ok(attachment(CSV_MIME, "university-data.csv", csv.into_bytes()))
}
