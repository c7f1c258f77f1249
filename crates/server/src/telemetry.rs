//! Prometheus wiring for estimates, exports and provider calls.
use std::sync::Arc;
use std::time::Duration;

use adforecast::{EstimateMetrics, ExportError, ForecastError, Provenance};
use async_trait::async_trait;
use forecast::{KeywordIdea, KeywordMetricsProvider, ProviderError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

pub const ESTIMATES_TOTAL: &str = "adforecast_estimates_total";
pub const ESTIMATE_DURATION_SECONDS: &str = "adforecast_estimate_duration_seconds";
pub const PROVIDER_FAILURES_TOTAL: &str = "adforecast_provider_failures_total";
pub const EXPORTS_TOTAL: &str = "adforecast_exports_total";

/// Install the global Prometheus recorder and the estimate observer.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    adforecast::set_estimate_metrics(Some(Arc::new(PrometheusMetrics)));
    Ok(handle)
}

/// Forwards estimate and export outcomes to the `metrics` facade.
pub struct PrometheusMetrics;

impl EstimateMetrics for PrometheusMetrics {
    fn record_estimate(&self, latency: Duration, result: Result<&Provenance, &ForecastError>) {
        let source = match result {
            Ok(provenance) => provenance.label(),
            Err(ForecastError::InvalidInput(_)) => "invalid",
            Err(_) => "error",
        };
        metrics::counter!(ESTIMATES_TOTAL, "source" => source).increment(1);
        metrics::histogram!(ESTIMATE_DURATION_SECONDS).record(latency.as_secs_f64());
    }

    fn record_export(&self, _latency: Duration, result: Result<(), &ExportError>) {
        let outcome = match result {
            Ok(()) => "ok",
            Err(ExportError::MissingDestination) => "unconfigured",
            Err(ExportError::InvalidPayload(_)) => "invalid",
            Err(_) => "failed",
        };
        metrics::counter!(EXPORTS_TOTAL, "outcome" => outcome).increment(1);
    }
}

/// Provider decorator bounding each call to `timeout` and counting failures.
///
/// A call that runs past the budget is dropped and reported as
/// [`ProviderError::Request`], so source selection falls back to the table.
pub struct InstrumentedProvider {
    inner: Arc<dyn KeywordMetricsProvider>,
    timeout: Duration,
}

impl InstrumentedProvider {
    pub fn new(inner: Arc<dyn KeywordMetricsProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl KeywordMetricsProvider for InstrumentedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    async fn keyword_ideas(&self, keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError> {
        let outcome = match tokio::time::timeout(self.timeout, self.inner.keyword_ideas(keywords)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    provider = self.inner.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "provider_timeout"
                );
                Err(ProviderError::Request(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        };
        if outcome.is_err() {
            metrics::counter!(PROVIDER_FAILURES_TOTAL, "provider" => self.inner.name().to_string())
                .increment(1);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast::Unconfigured;

    struct Stalled;

    #[async_trait]
    impl KeywordMetricsProvider for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn keyword_ideas(&self, _keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![KeywordIdea::new("late").with_avg_cpc(9.0)])
        }
    }

    #[tokio::test]
    async fn instrumented_provider_is_transparent() {
        let provider = InstrumentedProvider::new(Arc::new(Unconfigured), Duration::from_secs(1));
        assert_eq!(provider.name(), Unconfigured.name());
        assert!(!provider.is_available());
        assert_eq!(
            provider.keyword_ideas(&["shoes".to_string()]).await,
            Err(ProviderError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn slow_provider_times_out_as_request_error() {
        let provider = InstrumentedProvider::new(Arc::new(Stalled), Duration::from_millis(50));
        let err = provider
            .keyword_ideas(&["shoes".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Request(msg) if msg.contains("timed out")));
    }
}
