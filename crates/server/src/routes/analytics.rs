use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Event counters keyed by event name.
pub async fn analytics_summary(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let events = state
        .events
        .snapshot()
        .into_iter()
        .map(|(name, summary)| serde_json::to_value(summary).map(|value| (name, value)))
        .collect::<Result<Map<String, Value>, serde_json::Error>>()?;

    Ok(Json(Value::Object(events)))
}
