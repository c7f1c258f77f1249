//! In-process event counters for UI interactions.
//!
//! Handlers record an event per call; nothing in the estimation path reads
//! these counters back.
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

pub const CALCULATE_CLICK: &str = "calculate_click";
pub const EXPORT_CLICK: &str = "export_click";

/// Aggregate for one event name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub count: u64,
    pub last_at: DateTime<Utc>,
    /// Payload of the most recent occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Value>,
}

#[derive(Debug, Default)]
pub struct EventLog {
    events: DashMap<String, EventSummary>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, name: &str, payload: Option<Value>) {
        self.track_at(name, payload, Utc::now());
    }

    fn track_at(&self, name: &str, payload: Option<Value>, at: DateTime<Utc>) {
        self.events
            .entry(name.to_string())
            .and_modify(|summary| {
                summary.count += 1;
                summary.last_at = at;
                if payload.is_some() {
                    summary.sample = payload.clone();
                }
            })
            .or_insert_with(|| EventSummary {
                count: 1,
                last_at: at,
                sample: payload.clone(),
            });
    }

    pub fn get(&self, name: &str) -> Option<EventSummary> {
        self.events.get(name).map(|entry| entry.value().clone())
    }

    /// All events, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, EventSummary)> {
        let mut events: Vec<_> = self
            .events
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        events.sort_by(|a, b| a.0.cmp(&b.0));
        events
    }
}
