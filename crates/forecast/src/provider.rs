//! Keyword metrics provider capability.
//!
//! A provider is either configured (and may still fail on any call) or not.
//! The engine asks [`is_available`](KeywordMetricsProvider::is_available) first
//! and never calls an unavailable provider.
use async_trait::async_trait;
use thiserror::Error;

use crate::KeywordIdea;

/// Failures reported by a keyword metrics provider. Source selection recovers
/// from every variant by falling back to the static table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("keyword metrics provider is not configured")]
    NotConfigured,

    #[error("keyword metrics authentication failed: {0}")]
    Auth(String),

    #[error("keyword metrics request failed: {0}")]
    Request(String),

    #[error("unexpected keyword metrics response: {0}")]
    Decode(String),
}

/// Source of live per-keyword CPC and click estimates.
#[async_trait]
pub trait KeywordMetricsProvider: Send + Sync {
    /// Short label used in logs and metrics.
    fn name(&self) -> &str;

    /// Whether the provider has everything it needs to attempt a call.
    fn is_available(&self) -> bool;

    /// Fetch ideas for the full keyword list in one call.
    async fn keyword_ideas(&self, keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError>;
}

/// Provider used when no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait]
impl KeywordMetricsProvider for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn keyword_ideas(&self, _keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError> {
        Err(ProviderError::NotConfigured)
    }
}
