//! Decoding of export request bodies.
//!
//! Browsers post the estimate as a form field `payload` holding URL-encoded
//! JSON; API clients post the estimate JSON directly, optionally wrapped as
//! `{"payload": "<url-encoded json>"}`.
use forecast::EstimateResult;
use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::ExportError;

/// Decode a URL-encoded JSON estimate.
pub fn decode_payload_str(raw: &str) -> Result<EstimateResult, ExportError> {
    let json = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| ExportError::InvalidPayload(format!("payload is not utf-8: {e}")))?;
    serde_json::from_str(&json).map_err(|e| ExportError::InvalidPayload(e.to_string()))
}

/// Decode a JSON body, unwrapping a string `payload` field when present.
pub fn decode_payload_value(body: Value) -> Result<EstimateResult, ExportError> {
    if let Some(Value::String(raw)) = body.get("payload") {
        return decode_payload_str(raw);
    }
    serde_json::from_value(body).map_err(|e| ExportError::InvalidPayload(e.to_string()))
}
