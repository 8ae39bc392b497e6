//! UniRank API Server binary
//!
//! HTTP REST API for the ranking indicator calculators and Excel interchange.

use clap::Parser;
use std::path::PathBuf;
use unirank::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "unirank-server")]
#[command(version)]
#[command(about = "UniRank API Server - HTTP REST API for university ranking data entry")]
#[command(long_about = r#"
UniRank API Server - HTTP REST API

Calculators:
  - POST /api/v1/calculate/fsr   - Faculty/Student ratio
  - POST /api/v1/calculate/ifr   - International Faculty ratio
  - POST /api/v1/calculate/isr   - International Student ratio

Interchange (requests that write carry an x-user-id header):
  - POST /api/v1/import                  - Import a workbook (raw body)
  - GET  /api/v1/sample                  - Download the sample workbook
  - POST /api/v1/records                 - Validate and store a record
  - GET  /api/v1/records/:name?user_id=  - Latest record (JSON)
  - GET  /api/v1/records/:name/xlsx      - Latest record as Excel
  - GET  /api/v1/records/:name/csv       - Latest record as CSV

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  unirank-server                           # Start on localhost:8080
  unirank-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/calculate/fsr \
    -H "Content-Type: application/json" \
    -d '{"total_academic_staff": 100, "total_students": 2000}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "UNIRANK_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "UNIRANK_PORT")]
    port: u16,

    /// Record store file
    #[arg(long, default_value = "unirank-store.json", env = "UNIRANK_STORE")]
    store: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        store_path: args.store,
    };

    run_api_server(config).await
}
