use serde::{Deserialize, Serialize};

/// Note attached to every result that was not computed from live metrics
/// while keywords were supplied.
pub const FALLBACK_NOTE: &str = "Used fallback sample data when API not available";

/// Metrics reported by a keyword provider for one keyword idea.
///
/// Every metric is optional. Source selection substitutes the request's target
/// CPC for a missing `avg_cpc` but zero for a missing `estimated_clicks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordIdea {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_monthly_searches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_cpc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_clicks: Option<f64>,
}

impl KeywordIdea {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            avg_monthly_searches: None,
            avg_cpc: None,
            estimated_clicks: None,
        }
    }

    pub fn with_avg_cpc(mut self, avg_cpc: f64) -> Self {
        self.avg_cpc = Some(avg_cpc);
        self
    }

    pub fn with_estimated_clicks(mut self, clicks: f64) -> Self {
        self.estimated_clicks = Some(clicks);
        self
    }
}

/// CPC and monthly click volume the calculator runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveInputs {
    pub cpc: f64,
    pub monthly_clicks: f64,
}

/// One month of the flat run-rate projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub month: u32,
    pub spend: f64,
    pub revenue: f64,
}

/// Estimation output, serialized with the camelCase field names clients expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub roi_pct: f64,
    pub estimated_cpc: f64,
    pub estimated_cpm: f64,
    #[serde(default)]
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
    #[serde(default)]
    pub used_api: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
