//! UniRank API Server module
//!
//! HTTP REST API over the calculators, the import service and the record
//! store. Run with `unirank-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
