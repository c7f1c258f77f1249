#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use adforecast::{KeywordIdea, KeywordMetricsProvider, ProviderError};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Provider double that replays a fixed answer and counts calls.
pub struct ScriptedProvider {
    answer: Result<Vec<KeywordIdea>, ProviderError>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn ideas(ideas: Vec<KeywordIdea>) -> Self {
        Self {
            answer: Ok(ideas),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            answer: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeywordMetricsProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn keyword_ideas(&self, _keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

pub fn request(keywords: &[&str]) -> Value {
    json!({
        "keywords": keywords,
        "targetCpc": 2,
        "estimatedMonthlyClicks": 500,
        "conversionRatePct": 3,
        "targetRoas": 4,
        "campaignMonths": 3
    })
}
