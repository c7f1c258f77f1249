//! Error types produced by the estimation engine.
//!
//! Only two failure classes ever leave the engine:
//!
//! | Error | Category | HTTP |
//! |-------|----------|------|
//! | [`InvalidInput`](ForecastError::InvalidInput) | Validation | 400 |
//! | [`Internal`](ForecastError::Internal) | Computation | 500 |
//!
//! Keyword provider failures are [`ProviderError`](crate::ProviderError)s and
//! are always recovered inside source selection, so they never show up here.
use thiserror::Error;

/// Errors surfaced by [`estimate`](crate::estimate) and the request validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForecastError {
    /// A request field is missing, has the wrong type, or is not strictly positive.
    ///
    /// ```rust
    /// use forecast::ForecastError;
    ///
    /// let err = ForecastError::InvalidInput("targetCpc must be greater than zero".into());
    /// assert!(err.to_string().contains("targetCpc"));
    /// assert_eq!(err.http_status_code(), 400);
    /// ```
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The arithmetic produced something a validated request never should
    /// (zero spend, non-finite ROI).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ForecastError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ForecastError::InvalidInput(msg.into())
    }

    /// Returns true when the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ForecastError::InvalidInput(_))
    }

    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ForecastError::InvalidInput(_) => 400,
            ForecastError::Internal(_) => 500,
        }
    }
}
