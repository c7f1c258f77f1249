use crate::analytics::CALCULATE_CLICK;
use crate::error::ServerResult;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// Estimate spend, revenue and ROI for a campaign request.
///
/// The body is parsed by hand so malformed JSON gets the same
/// `{"error":"Invalid input"}` response as a failed validation.
pub async fn estimate(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<impl IntoResponse> {
    let body: Value = serde_json::from_slice(&body)?;

    let keyword_count = body
        .get("keywords")
        .and_then(Value::as_array)
        .map(Vec::len);
    state
        .events
        .track(CALCULATE_CLICK, Some(json!({ "keywordCount": keyword_count })));

    let estimate =
        adforecast::run_estimate(&body, state.provider.as_ref(), &state.fallback).await?;
    tracing::debug!(
        source = estimate.provenance.label(),
        used_api = estimate.result.used_api,
        "estimate_served"
    );
    Ok(Json(estimate.result))
}
