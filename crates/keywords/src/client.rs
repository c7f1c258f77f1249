use std::time::Duration;

use async_trait::async_trait;
use forecast::{KeywordIdea, KeywordMetricsProvider, ProviderError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::serde_int64;
use crate::{GoogleAdsConfig, GoogleAdsCredentials, GoogleAdsError};

const MICROS_PER_UNIT: f64 = 1_000_000.0;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateKeywordIdeasResponse {
    #[serde(default)]
    results: Vec<KeywordIdeaResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeywordIdeaResult {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    keyword_idea_metrics: Option<KeywordIdeaMetrics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeywordIdeaMetrics {
    #[serde(default, deserialize_with = "serde_int64::option")]
    avg_monthly_searches: Option<i64>,
    #[serde(default, deserialize_with = "serde_int64::option")]
    average_cpc_micros: Option<i64>,
}

/// Live keyword metrics from the Google Ads keyword planner.
///
/// Each call exchanges the refresh token for an access token and then issues a
/// single `generateKeywordIdeas` request seeded with every keyword. There is
/// no retry; any failure is returned as-is and the estimator falls back.
pub struct GoogleAdsProvider {
    credentials: Option<GoogleAdsCredentials>,
    config: GoogleAdsConfig,
    http: reqwest::Client,
}

impl GoogleAdsProvider {
    pub fn new(
        credentials: Option<GoogleAdsCredentials>,
        config: GoogleAdsConfig,
    ) -> Result<Self, GoogleAdsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            credentials,
            config,
            http,
        })
    }

    /// Provider configured from the `GOOGLE_ADS_*` environment variables.
    pub fn from_env(config: GoogleAdsConfig) -> Result<Self, GoogleAdsError> {
        Self::new(GoogleAdsCredentials::from_env(), config)
    }

    pub fn config(&self) -> &GoogleAdsConfig {
        &self.config
    }

    /// Fetch keyword ideas for the whole seed list.
    pub async fn generate_keyword_ideas(
        &self,
        keywords: &[String],
    ) -> Result<Vec<KeywordIdea>, GoogleAdsError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(GoogleAdsError::MissingCredentials)?;

        let access_token = self.access_token(creds).await?;
        let url = self.config.keyword_ideas_url(&creds.customer_id);
        debug!(keyword_count = keywords.len(), %url, "google_ads_request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header("developer-token", &creds.developer_token)
            .header("login-customer-id", &creds.login_customer_id)
            .json(&keyword_seed_payload(keywords))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleAdsError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        parse_keyword_ideas(body, self.config.click_through_rate)
    }

    async fn access_token(&self, creds: &GoogleAdsCredentials) -> Result<String, GoogleAdsError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("refresh_token", creds.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| GoogleAdsError::Token(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleAdsError::Token(format!("HTTP {status}: {body}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map(|token| token.access_token)
            .map_err(|e| GoogleAdsError::Token(format!("invalid token response: {e}")))
    }
}

#[async_trait]
impl KeywordMetricsProvider for GoogleAdsProvider {
    fn name(&self) -> &str {
        "google_ads"
    }

    fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    async fn keyword_ideas(&self, keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError> {
        self.generate_keyword_ideas(keywords).await.map_err(|err| {
            warn!(error = %err, "google_ads_failure");
            ProviderError::from(err)
        })
    }
}

fn keyword_seed_payload(keywords: &[String]) -> Value {
    json!({ "keywordSeed": { "keywords": keywords } })
}

/// Convert a `generateKeywordIdeas` response body into [`KeywordIdea`]s.
///
/// CPC is reported in micros; an idea without `averageCpcMicros` costs 0 and
/// still counts toward the average. Estimated clicks are the monthly searches times
/// `click_through_rate`, rounded to a whole click.
fn parse_keyword_ideas(
    body: Value,
    click_through_rate: f64,
) -> Result<Vec<KeywordIdea>, GoogleAdsError> {
    let response: GenerateKeywordIdeasResponse =
        serde_json::from_value(body).map_err(|e| GoogleAdsError::Decode(e.to_string()))?;

    Ok(response
        .results
        .into_iter()
        .map(|row| {
            let metrics = row.keyword_idea_metrics.unwrap_or_default();
            let searches = metrics.avg_monthly_searches.unwrap_or(0) as f64;
            KeywordIdea {
                keyword: row.text.unwrap_or_else(|| "keyword".to_string()),
                avg_monthly_searches: Some(searches),
                avg_cpc: Some(metrics.average_cpc_micros.unwrap_or(0) as f64 / MICROS_PER_UNIT),
                estimated_clicks: Some((searches * click_through_rate).round()),
            }
        })
        .collect())
}
