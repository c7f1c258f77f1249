use thiserror::Error;

/// Errors raised while exporting an estimate. None of them are retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// No spreadsheet id is configured.
    #[error("missing destination identifier")]
    MissingDestination,

    /// The export body could not be decoded into an estimate.
    #[error("invalid export payload: {0}")]
    InvalidPayload(String),

    /// Service-account credentials are absent or were rejected.
    #[error("export authentication failed: {0}")]
    Auth(String),

    /// The destination refused or failed the append.
    #[error("failed to export: {0}")]
    Append(String),
}

impl ExportError {
    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ExportError::MissingDestination | ExportError::InvalidPayload(_) => 400,
            ExportError::Auth(_) | ExportError::Append(_) => 500,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ExportError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ExportError::Auth(err.to_string())
    }
}
