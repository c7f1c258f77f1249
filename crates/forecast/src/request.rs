//! Estimate request shape and its validator.
//!
//! Requests arrive as untyped JSON. [`EstimateRequest::from_value`] checks the
//! shape and positivity rules in a fixed order and either hands back a typed
//! request or an [`InvalidInput`](ForecastError::InvalidInput) naming the first
//! field that failed. No upper bounds are enforced.
use serde::Serialize;
use serde_json::{Map, Value};

use crate::ForecastError;

/// Validated estimation input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub keywords: Vec<String>,
    pub target_cpc: f64,
    pub estimated_monthly_clicks: f64,
    /// Checked for presence and positivity, never used in the arithmetic.
    pub conversion_rate_pct: f64,
    pub target_roas: f64,
    pub campaign_months: u32,
}

impl EstimateRequest {
    /// Parse and validate an untyped request body.
    ///
    /// ```rust
    /// use forecast::EstimateRequest;
    /// use serde_json::json;
    ///
    /// let req = EstimateRequest::from_value(&json!({
    ///     "keywords": ["shoes"],
    ///     "targetCpc": 2,
    ///     "estimatedMonthlyClicks": 500,
    ///     "conversionRatePct": 3,
    ///     "targetRoas": 4,
    ///     "campaignMonths": 3
    /// }))
    /// .unwrap();
    /// assert_eq!(req.campaign_months, 3);
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, ForecastError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ForecastError::invalid("request body must be a JSON object"))?;

        let keywords = parse_keywords(obj)?;
        let target_cpc = positive_number(obj, "targetCpc")?;
        let estimated_monthly_clicks = positive_number(obj, "estimatedMonthlyClicks")?;
        let conversion_rate_pct = positive_number(obj, "conversionRatePct")?;
        let target_roas = positive_number(obj, "targetRoas")?;
        let campaign_months = month_count(positive_number(obj, "campaignMonths")?)?;

        Ok(Self {
            keywords,
            target_cpc,
            estimated_monthly_clicks,
            conversion_rate_pct,
            target_roas,
            campaign_months,
        })
    }

    /// Re-check the positivity invariants on a request built in code.
    pub fn validate(&self) -> Result<(), ForecastError> {
        let fields = [
            ("targetCpc", self.target_cpc),
            ("estimatedMonthlyClicks", self.estimated_monthly_clicks),
            ("conversionRatePct", self.conversion_rate_pct),
            ("targetRoas", self.target_roas),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ForecastError::invalid(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        if self.campaign_months == 0 {
            return Err(ForecastError::invalid(
                "campaignMonths must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }
}

fn parse_keywords(obj: &Map<String, Value>) -> Result<Vec<String>, ForecastError> {
    let items = obj
        .get("keywords")
        .and_then(Value::as_array)
        .ok_or_else(|| ForecastError::invalid("keywords must be an array"))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| ForecastError::invalid("keywords must contain only strings"))
        })
        .collect()
}

fn positive_number(obj: &Map<String, Value>, field: &str) -> Result<f64, ForecastError> {
    let value = obj
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| ForecastError::invalid(format!("{field} must be a number")))?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ForecastError::invalid(format!(
            "{field} must be greater than zero"
        )))
    }
}

fn month_count(value: f64) -> Result<u32, ForecastError> {
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(ForecastError::invalid(
            "campaignMonths must be a whole number of months",
        ));
    }
    Ok(value as u32)
}
