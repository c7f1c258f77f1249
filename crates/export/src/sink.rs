use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use forecast::EstimateResult;
use serde_json::{json, Value};

use crate::ExportError;

/// The flat row appended for one exported estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub timestamp: DateTime<Utc>,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub roi_pct: f64,
    pub estimated_cpc: f64,
    pub estimated_cpm: f64,
}

impl ExportRow {
    pub fn from_result(result: &EstimateResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            total_spend: result.total_spend,
            total_revenue: result.total_revenue,
            roi_pct: result.roi_pct,
            estimated_cpc: result.estimated_cpc,
            estimated_cpm: result.estimated_cpm,
        }
    }

    /// `[timestamp, totalSpend, totalRevenue, roiPct, estimatedCpc, estimatedCpm]`,
    /// timestamp in RFC 3339 with millisecond precision and a `Z` suffix.
    pub fn to_values(&self) -> Vec<Value> {
        vec![
            json!(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
            json!(self.total_spend),
            json!(self.total_revenue),
            json!(self.roi_pct),
            json!(self.estimated_cpc),
            json!(self.estimated_cpm),
        ]
    }
}

/// Destination that accepts exported rows.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Identifier of the destination, `None` when not configured.
    fn destination(&self) -> Option<&str>;

    /// Append a single row. One attempt only.
    async fn append(&self, row: &ExportRow) -> Result<(), ExportError>;
}
