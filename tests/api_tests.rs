//! API integration tests
//!
//! Drives the router in-process with `oneshot`; no socket is bound.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use unirank::api::{build_router, AppState};
use unirank::excel::{SheetExporter, CSV_MIME, XLSX_MIME};
use unirank::store::{MemoryStore, RecordStore};

fn app() -> Router {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    build_router(Arc::new(AppState::new(store)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-user-id", "admin")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_workbook(bytes: Vec<u8>, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/import")
        .header(header::CONTENT_TYPE, XLSX_MIME);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    builder.body(Body::from(bytes)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// INFO ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_health() {
    let (status, body) = send_json(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["import_in_progress"], false);
    assert!(body["request_id"].as_str().is_some());
}

#[tokio::test]
async fn test_version_and_root() {
    let app = app();
    let (_, version) = send_json(&app, get("/version")).await;
    assert_eq!(version["data"]["version"], env!("CARGO_PKG_VERSION"));

    let (_, root) = send_json(&app, get("/")).await;
    assert_eq!(root["data"]["name"], "UniRank API Server");
    assert!(root["data"]["endpoints"].as_array().unwrap().len() >= 10);
}

// ═══════════════════════════════════════════════════════════════════════════
// CALCULATORS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_calculate_fsr() {
    let request = post_json(
        "/api/v1/calculate/fsr",
        json!({"total_academic_staff": 100, "total_students": 2000}),
    );
    let (status, body) = send_json(&app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["result"],
        json!({"ratio": 20.0, "percentage": 5.0, "score": 100.0})
    );
}

#[tokio::test]
async fn test_calculate_isr() {
    let request = post_json(
        "/api/v1/calculate/isr",
        json!({"international_students": 30, "total_students": 100}),
    );
    let (status, body) = send_json(&app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"]["score"], 90.0);
}

#[tokio::test]
async fn test_calculate_ifr_subset_rule_is_422() {
    let request = post_json(
        "/api/v1/calculate/ifr",
        json!({"international_staff": 150, "total_academic_staff": 100}),
    );
    let (status, body) = send_json(&app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["data"][0]["message"],
        "International staff cannot exceed total academic staff"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORT AND RECORDS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_import_then_fetch_record() {
    let app = app();
    let bytes = SheetExporter::sample().to_bytes().unwrap();

    let (status, body) = send_json(&app, post_workbook(bytes, Some("admin"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inserted"], 10);
    assert_eq!(
        body["data"]["message"],
        "Successfully imported 10 records to the database."
    );

    let (status, body) = send_json(
        &app,
        get("/api/v1/records/Stanford%20University?user_id=admin"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Stanford University");
    assert_eq!(body["data"]["rank"], 3);
}

#[tokio::test]
async fn test_import_requires_user() {
    let bytes = SheetExporter::sample().to_bytes().unwrap();
    let (status, body) = send_json(&app(), post_workbook(bytes, None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"][0]["field"], "x-user-id");
}

#[tokio::test]
async fn test_import_bad_workbook_is_400() {
    let (status, body) = send_json(&app(), post_workbook(b"nope".to_vec(), Some("admin"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read Excel file"));
}

#[tokio::test]
async fn test_missing_record_is_404() {
    let (status, body) = send_json(&app(), get("/api/v1/records/Nowhere?user_id=admin")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No record found for 'Nowhere'");
}

#[tokio::test]
async fn test_records_are_scoped_to_user() {
    let app = app();
    let bytes = SheetExporter::sample().to_bytes().unwrap();
    send(&app, post_workbook(bytes, Some("admin"))).await;

    let (status, _) = send(&app, get("/api/v1/records/Stanford%20University?user_id=guest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_then_download_csv_and_xlsx() {
    let app = app();
    let mut record = json!({
        "name": "Universiti Tun Hussein Onn Malaysia",
        "rank": 1201,
        "classification": {
            "size": "M", "focus": "FO", "research": "LO", "status": "Public"
        },
        "indicators": {},
        "overall_score": 14.2
    });
    for field in [
        "academic_reputation",
        "employer_reputation",
        "faculty_student_ratio",
        "citations_per_faculty",
        "international_faculty",
        "international_students",
        "international_students_diversity",
        "international_research_network",
        "employment_outcomes",
        "sustainability",
    ] {
        record["indicators"][field] = json!({"score": 12.5, "rank": null});
    }

    let (status, body) = send_json(&app, post_json("/api/v1/records", record)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["id"].as_str().is_some());

    let name = "Universiti%20Tun%20Hussein%20Onn%20Malaysia";
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/records/{name}/csv?user_id=admin")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], CSV_MIME);
    let csv = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(csv.to_vec()).unwrap();
    assert!(csv.starts_with("academic_reputation,12.5\n"));
    assert!(csv.contains("ranking,1201\n"));

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/records/{name}/xlsx?user_id=admin")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_MIME);
}

#[tokio::test]
async fn test_submit_invalid_record_is_422() {
    let record = json!({"name": "Incomplete", "rank": 0});
    let (status, body) = send_json(&app(), post_json("/api/v1/records", record)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "ranking" && e["message"] == "Must be at least 1"));
}

#[tokio::test]
async fn test_sample_download() {
    let (status, body) = send(&app(), get("/api/v1/sample")).await;
    assert_eq!(status, StatusCode::OK);
    // xlsx is a zip container
    assert_eq!(&body[..2], b"PK");
}
