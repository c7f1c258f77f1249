use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use export::ExportError;
use forecast::ForecastError;
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types.
///
/// The body is always `{"error": "<message>"}` with a short public message;
/// details stay in the logs.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidInput(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Export(err) => StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client
    fn public_message(&self) -> &'static str {
        match self {
            ServerError::InvalidInput(_) => "Invalid input",
            ServerError::BadRequest(_) => "Bad request",
            ServerError::Export(ExportError::MissingDestination) => "Missing GOOGLE_SHEETS_ID",
            ServerError::Export(ExportError::InvalidPayload(_)) => "Invalid input",
            ServerError::Export(_) => "Failed to export to Google Sheets",
            ServerError::MethodNotAllowed => "Method not allowed",
            ServerError::NotFound => "Not found",
            ServerError::Internal(_) | ServerError::Config(_) => "Internal server error",
        }
    }
}

impl From<ForecastError> for ServerError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::InvalidInput(msg) => ServerError::InvalidInput(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request_failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request_rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

impl From<adforecast::SetupError> for ServerError {
    fn from(err: adforecast::SetupError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::InvalidInput(format!("JSON parse error: {err}"))
    }
}
