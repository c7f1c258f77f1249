//! Workspace umbrella crate for adforecast.
//!
//! Wires the estimation engine ([`forecast`]), the Google Ads keyword provider
//! ([`keywords`]) and the export surfaces ([`export`]) together, so binaries
//! can build every collaborator from the environment and run estimates and
//! exports through one entry point with an optional metrics observer.

pub use export::{
    decode_payload_str, decode_payload_value, render_csv, ExportError, ExportRow, ExportSink,
    GoogleSheetsSink, SheetsConfig, CSV_CONTENT_TYPE, CSV_FILE_NAME,
};
pub use forecast::{
    compute_forecast, estimate, estimate_detailed, estimate_value, estimate_value_detailed,
    Estimate, EstimateRequest, EstimateResult, FallbackEntry, FallbackTable, FallbackTableError,
    ForecastError, KeywordIdea, KeywordMetricsProvider, MonthlyBreakdown, Provenance,
    ProviderError, Unconfigured, FALLBACK_NOTE,
};
pub use keywords::{has_google_ads_env, GoogleAdsConfig, GoogleAdsError, GoogleAdsProvider};

use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

/// Failures while building collaborators from the environment.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("keyword provider setup failed: {0}")]
    Provider(#[from] GoogleAdsError),

    #[error("export sink setup failed: {0}")]
    Sink(#[from] ExportError),

    #[error("fallback table could not be loaded: {0}")]
    FallbackTable(#[from] FallbackTableError),
}

/// Metrics observer for estimates and exports.
pub trait EstimateMetrics: Send + Sync {
    fn record_estimate(&self, latency: Duration, result: Result<&Provenance, &ForecastError>);
    fn record_export(&self, latency: Duration, result: Result<(), &ExportError>);
}

/// Install or clear the global metrics observer.
pub fn set_estimate_metrics(recorder: Option<Arc<dyn EstimateMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn EstimateMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn EstimateMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn EstimateMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn EstimateMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_estimate(self, result: Result<&Provenance, &ForecastError>) {
        self.recorder.record_estimate(self.start.elapsed(), result);
    }

    fn record_export(self, result: Result<(), &ExportError>) {
        self.recorder.record_export(self.start.elapsed(), result);
    }
}

/// Run an estimate for an untyped request body, reporting to the installed
/// [`EstimateMetrics`].
pub async fn run_estimate(
    body: &Value,
    provider: &dyn KeywordMetricsProvider,
    table: &FallbackTable,
) -> Result<Estimate, ForecastError> {
    let span = MetricsSpan::start();
    let outcome = estimate_value_detailed(body, provider, table).await;
    if let Some(span) = span {
        span.record_estimate(outcome.as_ref().map(|estimate| &estimate.provenance));
    }
    outcome
}

/// Append one row for `result` to `sink`, stamped with the current time.
pub async fn export_estimate(
    sink: &dyn ExportSink,
    result: &EstimateResult,
) -> Result<ExportRow, ExportError> {
    let span = MetricsSpan::start();
    let start = Instant::now();
    let row = ExportRow::from_result(result, Utc::now());
    let outcome = sink.append(&row).await;

    match &outcome {
        Ok(()) => info!(
            destination = sink.destination().unwrap_or_default(),
            elapsed_micros = start.elapsed().as_micros(),
            "export_success"
        ),
        Err(err) => warn!(
            error = %err,
            elapsed_micros = start.elapsed().as_micros(),
            "export_failure"
        ),
    }
    if let Some(span) = span {
        span.record_export(outcome.as_ref().map(|_| ()));
    }
    outcome.map(|()| row)
}

/// Live provider when all `GOOGLE_ADS_*` variables are set, otherwise
/// [`Unconfigured`].
pub fn provider_from_env(
    config: GoogleAdsConfig,
) -> Result<Arc<dyn KeywordMetricsProvider>, SetupError> {
    if !has_google_ads_env() {
        info!("google_ads_unconfigured");
        return Ok(Arc::new(Unconfigured));
    }
    Ok(Arc::new(GoogleAdsProvider::from_env(config)?))
}

/// Sheets sink from the `GOOGLE_SERVICE_ACCOUNT_*` and `GOOGLE_SHEETS_ID`
/// variables. Missing values surface when an export is attempted.
pub fn sink_from_env() -> Result<Arc<dyn ExportSink>, SetupError> {
    Ok(Arc::new(GoogleSheetsSink::new(SheetsConfig::from_env())?))
}

/// The table at `path`, or the built-in one.
pub fn load_fallback_table(path: Option<&Path>) -> Result<FallbackTable, SetupError> {
    match path {
        Some(path) => {
            let table = FallbackTable::from_path(path)?;
            info!(path = %path.display(), entries = table.len(), "fallback_table_loaded");
            Ok(table)
        }
        None => Ok(FallbackTable::builtin()),
    }
}
