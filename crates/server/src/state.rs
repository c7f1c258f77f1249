use crate::analytics::EventLog;
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::telemetry::InstrumentedProvider;
use export::ExportSink;
use forecast::{FallbackTable, KeywordMetricsProvider};
use keywords::GoogleAdsConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Live keyword metrics, or `Unconfigured`
    pub provider: Arc<dyn KeywordMetricsProvider>,

    /// Read-only fallback table shared by every request
    pub fallback: Arc<FallbackTable>,

    /// Export destination
    pub sink: Arc<dyn ExportSink>,

    /// UI event counters
    pub events: Arc<EventLog>,

    /// Prometheus renderer when metrics are enabled
    pub prometheus: Option<PrometheusHandle>,
}

impl ServerState {
    /// Build state from the configuration and the provider/sheet environment.
    pub fn from_env(config: ServerConfig) -> ServerResult<Self> {
        let table = adforecast::load_fallback_table(config.fallback_table_path.as_deref())?;
        let provider = adforecast::provider_from_env(
            GoogleAdsConfig::default().with_timeout_secs(config.provider_timeout_secs),
        )?;
        let sink = adforecast::sink_from_env()?;

        Ok(Self::new(config, provider, table, sink))
    }

    /// State with explicit collaborators.
    pub fn new(
        config: ServerConfig,
        provider: Arc<dyn KeywordMetricsProvider>,
        fallback: FallbackTable,
        sink: Arc<dyn ExportSink>,
    ) -> Self {
        let provider = InstrumentedProvider::new(provider, config.provider_timeout());
        Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            fallback: Arc::new(fallback),
            sink,
            events: Arc::new(EventLog::new()),
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
    pub provider: String,
    pub live_metrics: bool,
    pub export_configured: bool,
    pub fallback_entries: usize,
}
