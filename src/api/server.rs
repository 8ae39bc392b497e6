//! UniRank API Server implementation
//!
//! HTTP REST API server using Axum: indicator calculators, workbook import,
//! sample download and per-record exports.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handlers;
use crate::core::{FsrInput, IfrInput, IsrInput};
use crate::import::ImportService;
use crate::store::{JsonFileStore, RecordStore};

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub store_path: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            store_path: PathBuf::from("unirank-store.json"),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub store: Arc<dyn RecordStore>,
    /// One importer per server, so the busy flag spans all requests
    pub importer: ImportService<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            importer: ImportService::new(Arc::clone(&store)),
            store,
        }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Calculators
        .route("/api/v1/calculate/fsr", post(handlers::calculate::<FsrInput>))
        .route("/api/v1/calculate/ifr", post(handlers::calculate::<IfrInput>))
        .route("/api/v1/calculate/isr", post(handlers::calculate::<IsrInput>))
        // Interchange
        .route("/api/v1/import", post(handlers::import_excel))
        .route("/api/v1/sample", get(handlers::sample))
        // Records
        .route("/api/v1/records", post(handlers::submit))
        .route("/api/v1/records/:name", get(handlers::record))
        .route("/api/v1/records/:name/xlsx", get(handlers::record_xlsx))
        .route("/api/v1/records/:name/csv", get(handlers::record_csv))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unirank=info,tower_http=info".into()),
        )
        .init();

    let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::new(&config.store_path));
    let app = build_router(Arc::new(AppState::new(store)));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🎓 UniRank API Server starting on http://{}", addr);
    info!("   Store: {}", config.store_path.display());
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("UniRank API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
