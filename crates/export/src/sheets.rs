use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{ExportError, ExportRow, ExportSink};

pub const ENV_SERVICE_ACCOUNT_EMAIL: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
pub const ENV_SERVICE_ACCOUNT_PRIVATE_KEY: &str = "GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY";
pub const ENV_SHEETS_ID: &str = "GOOGLE_SHEETS_ID";

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Service account and spreadsheet settings for [`GoogleSheetsSink`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub service_account_email: Option<String>,
    /// PEM private key. Literal `\n` sequences are accepted.
    pub private_key: Option<String>,
    pub spreadsheet_id: Option<String>,
    /// A1 range rows are appended to.
    pub range: String,
    pub token_url: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            service_account_email: None,
            private_key: None,
            spreadsheet_id: None,
            range: "Sheet1!A:F".into(),
            token_url: "https://oauth2.googleapis.com/token".into(),
            api_base: "https://sheets.googleapis.com".into(),
            timeout_secs: 30,
        }
    }
}

impl SheetsConfig {
    /// Defaults plus the `GOOGLE_SERVICE_ACCOUNT_*` and `GOOGLE_SHEETS_ID` variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            service_account_email: get(ENV_SERVICE_ACCOUNT_EMAIL),
            private_key: get(ENV_SERVICE_ACCOUNT_PRIVATE_KEY),
            spreadsheet_id: get(ENV_SHEETS_ID),
            ..Self::default()
        }
    }

    pub fn append_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=RAW",
            self.api_base.trim_end_matches('/'),
            utf8_percent_encode(spreadsheet_id, NON_ALPHANUMERIC),
            utf8_percent_encode(&self.range, NON_ALPHANUMERIC),
        )
    }
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("service_account_email", &self.service_account_email)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Appends rows to a Google Sheet as a service account.
pub struct GoogleSheetsSink {
    config: SheetsConfig,
    http: reqwest::Client,
}

impl GoogleSheetsSink {
    pub fn new(config: SheetsConfig) -> Result<Self, ExportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExportError::Append(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn signed_assertion(&self) -> Result<String, ExportError> {
        let email = self
            .config
            .service_account_email
            .as_deref()
            .ok_or_else(|| ExportError::Auth("service account email not configured".into()))?;
        let key = self
            .config
            .private_key
            .as_deref()
            .ok_or_else(|| ExportError::Auth("service account private key not configured".into()))?;

        let pem = normalize_private_key(key);
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())?;
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: email,
            scope: SHEETS_SCOPE,
            aud: &self.config.token_url,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?)
    }

    async fn access_token(&self) -> Result<String, ExportError> {
        let assertion = self.signed_assertion()?;
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await
            .map_err(|e| ExportError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Auth(format!("HTTP {status}: {body}")));
        }
        response
            .json::<TokenResponse>()
            .await
            .map(|token| token.access_token)
            .map_err(|e| ExportError::Auth(format!("invalid token response: {e}")))
    }
}

#[async_trait]
impl ExportSink for GoogleSheetsSink {
    fn destination(&self) -> Option<&str> {
        self.config.spreadsheet_id.as_deref()
    }

    async fn append(&self, row: &ExportRow) -> Result<(), ExportError> {
        let spreadsheet_id = self.destination().ok_or(ExportError::MissingDestination)?;
        let token = self.access_token().await?;

        let response = self
            .http
            .post(self.config.append_url(spreadsheet_id))
            .bearer_auth(token)
            .json(&append_body(row))
            .send()
            .await
            .map_err(|e| ExportError::Append(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, spreadsheet_id, "sheets_append_rejected");
            return Err(ExportError::Append(format!("HTTP {status}: {body}")));
        }

        info!(spreadsheet_id, range = %self.config.range, "sheets_append_success");
        Ok(())
    }
}

fn append_body(row: &ExportRow) -> Value {
    json!({ "values": [row.to_values()] })
}

fn normalize_private_key(key: &str) -> String {
    key.replace("\\n", "\n")
}
