//! Campaign estimation engine.
//!
//! Takes a campaign request (keywords plus target CPC, click volume, ROAS and
//! duration) and projects spend, revenue, ROI and CPM month by month.
//!
//! ## Where the numbers come from
//!
//! The CPC and click volume the projection runs on are picked per request:
//!
//! - **Live** - a configured [`KeywordMetricsProvider`] is asked once for the
//!   whole keyword list and its ideas are averaged.
//! - **Fallback** - no provider, a failed call, or an empty answer: the first
//!   keyword found in the [`FallbackTable`] supplies both values.
//! - **Defaults** - no keywords, or no table match: the request's own targets.
//!
//! Provider trouble never reaches the caller; it only shows up as
//! `used_api == false` and a note on the result.
//!
//! ## Example
//!
//! ```
//! use forecast::{estimate_value, FallbackTable, Unconfigured};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let body = json!({
//!     "keywords": [],
//!     "targetCpc": 2,
//!     "estimatedMonthlyClicks": 500,
//!     "conversionRatePct": 3,
//!     "targetRoas": 4,
//!     "campaignMonths": 3
//! });
//!
//! let result = estimate_value(&body, &Unconfigured, &FallbackTable::builtin())
//!     .await
//!     .unwrap();
//! assert_eq!(result.total_spend, 3000.0);
//! assert_eq!(result.roi_pct, 300.0);
//! assert!(!result.used_api);
//! # }
//! ```
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

mod calculator;
mod error;
mod fallback;
mod provider;
mod request;
mod source;
mod types;

pub use crate::calculator::{compute_forecast, Forecast};
pub use crate::error::ForecastError;
pub use crate::fallback::{FallbackEntry, FallbackTable, FallbackTableError};
pub use crate::provider::{KeywordMetricsProvider, ProviderError, Unconfigured};
pub use crate::request::EstimateRequest;
pub use crate::source::{average_ideas, select_source, Provenance, SourceSelection};
pub use crate::types::{
    EffectiveInputs, EstimateResult, KeywordIdea, MonthlyBreakdown, FALLBACK_NOTE,
};

/// Result plus the provenance of its inputs, for callers that record where
/// the numbers came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub result: EstimateResult,
    pub provenance: Provenance,
}

/// Validate an untyped body, then run [`estimate`].
pub async fn estimate_value(
    body: &Value,
    provider: &dyn KeywordMetricsProvider,
    table: &FallbackTable,
) -> Result<EstimateResult, ForecastError> {
    estimate_value_detailed(body, provider, table)
        .await
        .map(|estimate| estimate.result)
}

/// [`estimate_value`] keeping the provenance.
pub async fn estimate_value_detailed(
    body: &Value,
    provider: &dyn KeywordMetricsProvider,
    table: &FallbackTable,
) -> Result<Estimate, ForecastError> {
    let request = match EstimateRequest::from_value(body) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "estimate_rejected");
            return Err(err);
        }
    };
    estimate_detailed(&request, provider, table).await
}

/// Run source selection and the forecast for a validated request.
pub async fn estimate(
    request: &EstimateRequest,
    provider: &dyn KeywordMetricsProvider,
    table: &FallbackTable,
) -> Result<EstimateResult, ForecastError> {
    estimate_detailed(request, provider, table)
        .await
        .map(|estimate| estimate.result)
}

/// Same as [`estimate`] but also reports the provenance of the inputs.
pub async fn estimate_detailed(
    request: &EstimateRequest,
    provider: &dyn KeywordMetricsProvider,
    table: &FallbackTable,
) -> Result<Estimate, ForecastError> {
    let start = Instant::now();
    request.validate()?;

    let selection = select_source(request, provider, table).await;
    let forecast = match compute_forecast(
        selection.inputs,
        request.campaign_months,
        request.target_roas,
    ) {
        Ok(forecast) => forecast,
        Err(err) => {
            warn!(
                source = selection.provenance.label(),
                error = %err,
                elapsed_micros = start.elapsed().as_micros(),
                "estimate_failure"
            );
            return Err(err);
        }
    };

    info!(
        keyword_count = request.keywords.len(),
        source = selection.provenance.label(),
        campaign_months = request.campaign_months,
        total_spend = forecast.total_spend,
        elapsed_micros = start.elapsed().as_micros(),
        "estimate_success"
    );

    let result = EstimateResult {
        total_spend: forecast.total_spend,
        total_revenue: forecast.total_revenue,
        roi_pct: forecast.roi_pct,
        estimated_cpc: forecast.estimated_cpc,
        estimated_cpm: forecast.estimated_cpm,
        monthly_breakdown: forecast.monthly_breakdown,
        used_api: selection.used_api(),
        notes: selection.notes().map(str::to_owned),
    };

    Ok(Estimate {
        result,
        provenance: selection.provenance,
    })
}
