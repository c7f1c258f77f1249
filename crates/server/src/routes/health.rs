use crate::error::{ServerError, ServerResult};
use crate::state::{ServerMetadata, ServerState};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "adforecast-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// Always ready: estimates degrade to fallback data without live metrics,
/// so the component block only reports which sources are configured.
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let live = if state.provider.is_available() {
        "configured"
    } else {
        "fallback_only"
    };
    let export = if state.sink.destination().is_some() {
        "configured"
    } else {
        "unconfigured"
    };

    Ok(Json(json!({
        "status": "ready",
        "service": "adforecast-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "keyword_metrics": live,
            "fallback_table": state.fallback.len(),
            "export": export,
        }
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    if !state.config.metrics_enabled {
        return Err(ServerError::NotFound);
    }
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

/// Server metadata endpoint
pub async fn server_metadata(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let metadata = ServerMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime_seconds(),
        provider: state.provider.name().to_string(),
        live_metrics: state.provider.is_available(),
        export_configured: state.sink.destination().is_some(),
        fallback_entries: state.fallback.len(),
    };

    Ok(Json(serde_json::to_value(metadata)?))
}
