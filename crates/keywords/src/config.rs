use serde::{Deserialize, Serialize};

/// Endpoints and tuning for the Google Ads keyword-ideas call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GoogleAdsConfig {
    /// Base URL of the Google Ads REST API.
    pub api_base: String,
    /// API version path segment, e.g. `"v17"`.
    pub api_version: String,
    /// OAuth token endpoint used for the refresh-token grant.
    pub token_url: String,
    /// Overall HTTP timeout in seconds for each request.
    pub timeout_secs: u64,
    /// Share of monthly searches expected to turn into clicks.
    pub click_through_rate: f64,
}

impl Default for GoogleAdsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://googleads.googleapis.com".into(),
            api_version: "v17".into(),
            token_url: "https://oauth2.googleapis.com/token".into(),
            timeout_secs: 30,
            click_through_rate: 0.05,
        }
    }
}

impl GoogleAdsConfig {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// `POST` target for `KeywordPlanIdeaService.GenerateKeywordIdeas`.
    pub fn keyword_ideas_url(&self, customer_id: &str) -> String {
        format!(
            "{}/{}/customers/{}:generateKeywordIdeas",
            self.api_base.trim_end_matches('/'),
            self.api_version,
            customer_id
        )
    }
}
