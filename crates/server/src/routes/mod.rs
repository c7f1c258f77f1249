//! API route handlers
//!
//! - `health`: liveness, readiness and metrics
//! - `estimate`: campaign estimates
//! - `exports`: Sheets append and CSV download
//! - `analytics`: UI event counters

pub mod analytics;
pub mod estimate;
pub mod exports;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// ```json
/// {
///   "name": "adforecast",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "adforecast",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /api/estimate",
            "POST /api/export",
            "POST /api/export/csv",
            "GET /api/analytics",
            "GET /api/metadata",
            "GET /health",
            "GET /ready",
            "GET /metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// 405 for known paths hit with the wrong method
pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}
