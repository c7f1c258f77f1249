use forecast::ProviderError;
use thiserror::Error;

/// Errors raised while talking to the Google Ads API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoogleAdsError {
    /// One or more of the six credential variables is absent.
    #[error("missing Google Ads credentials")]
    MissingCredentials,

    /// The OAuth refresh-token exchange failed.
    #[error("token exchange failed: {0}")]
    Token(String),

    /// The API answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection, TLS or timeout failure.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GoogleAdsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GoogleAdsError::Decode(err.to_string())
        } else {
            GoogleAdsError::Transport(err.to_string())
        }
    }
}

impl From<GoogleAdsError> for ProviderError {
    fn from(err: GoogleAdsError) -> Self {
        match err {
            GoogleAdsError::MissingCredentials => ProviderError::NotConfigured,
            GoogleAdsError::Token(msg) => ProviderError::Auth(msg),
            GoogleAdsError::Http { status, body } if status == 401 || status == 403 => {
                ProviderError::Auth(format!("HTTP {status}: {body}"))
            }
            err @ (GoogleAdsError::Http { .. } | GoogleAdsError::Transport(_)) => {
                ProviderError::Request(err.to_string())
            }
            GoogleAdsError::Decode(msg) => ProviderError::Decode(msg),
        }
    }
}
