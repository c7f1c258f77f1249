use crate::analytics::EXPORT_CLICK;
use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::{Form, Json};
use export::{decode_payload_str, decode_payload_value, render_csv, CSV_CONTENT_TYPE, CSV_FILE_NAME};
use forecast::EstimateResult;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// HTML form post: one field holding the URL-encoded estimate JSON.
#[derive(Debug, Deserialize)]
pub struct ExportForm {
    pub payload: String,
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Read an estimate from either a form post or a JSON body.
async fn read_estimate(request: Request) -> ServerResult<EstimateResult> {
    if is_form(&request) {
        let Form(form) = Form::<ExportForm>::from_request(request, &())
            .await
            .map_err(|e| ServerError::InvalidInput(e.body_text()))?;
        return Ok(decode_payload_str(&form.payload)?);
    }

    let bytes = Bytes::from_request(request, &())
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok(decode_payload_value(body)?)
}

/// Append the estimate as one spreadsheet row.
pub async fn export_to_sheet(
    State(state): State<Arc<ServerState>>,
    request: Request,
) -> ServerResult<impl IntoResponse> {
    state
        .events
        .track(EXPORT_CLICK, Some(json!({ "format": "sheets" })));

    let result = read_estimate(request).await?;
    adforecast::export_estimate(state.sink.as_ref(), &result).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Render the estimate as a CSV download.
pub async fn export_csv(
    State(state): State<Arc<ServerState>>,
    request: Request,
) -> ServerResult<impl IntoResponse> {
    state
        .events
        .track(EXPORT_CLICK, Some(json!({ "format": "csv" })));

    let result = read_estimate(request).await?;
    let disposition = format!("attachment; filename=\"{CSV_FILE_NAME}\"");
    Ok((
        [(CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()), (CONTENT_DISPOSITION, disposition)],
        render_csv(&result),
    ))
}
