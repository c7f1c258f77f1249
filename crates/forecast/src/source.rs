//! Decides which CPC and click volume the forecast runs on.
//!
//! Exactly one of three outcomes applies per request:
//!
//! 1. no keywords: the request's own targets, no note;
//! 2. a live provider answered with at least one idea: averaged live metrics;
//! 3. otherwise: the first keyword found in the [`FallbackTable`], or the
//!    request's targets when nothing matches, plus [`FALLBACK_NOTE`].
//!
//! Provider failures and empty answers both land in outcome 3 and are never
//! returned to the caller.
use tracing::{debug, warn};

use crate::{
    EffectiveInputs, EstimateRequest, FallbackTable, KeywordIdea, KeywordMetricsProvider,
    FALLBACK_NOTE,
};

/// Where the effective inputs came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    /// No keywords were supplied.
    Defaults,
    /// Averaged from a non-empty provider answer.
    Live { idea_count: usize },
    /// Live data was unavailable. `matched` holds the keyword that hit the
    /// fallback table, if any.
    Fallback { matched: Option<String> },
}

impl Provenance {
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Defaults => "defaults",
            Provenance::Live { .. } => "live",
            Provenance::Fallback { matched: Some(_) } => "fallback",
            Provenance::Fallback { matched: None } => "fallback_unmatched",
        }
    }
}

/// Effective inputs plus their provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSelection {
    pub inputs: EffectiveInputs,
    pub provenance: Provenance,
}

impl SourceSelection {
    pub fn used_api(&self) -> bool {
        matches!(self.provenance, Provenance::Live { .. })
    }

    pub fn notes(&self) -> Option<&'static str> {
        match self.provenance {
            Provenance::Fallback { .. } => Some(FALLBACK_NOTE),
            _ => None,
        }
    }
}

/// Mean CPC and mean clicks over `ideas`.
///
/// A missing CPC counts as `target_cpc`, a missing click estimate counts as
/// zero. Returns `None` for an empty slice.
pub fn average_ideas(ideas: &[KeywordIdea], target_cpc: f64) -> Option<(f64, f64)> {
    if ideas.is_empty() {
        return None;
    }
    let n = ideas.len() as f64;
    let cpc_sum: f64 = ideas
        .iter()
        .map(|idea| idea.avg_cpc.unwrap_or(target_cpc))
        .sum();
    let clicks_sum: f64 = ideas
        .iter()
        .map(|idea| idea.estimated_clicks.unwrap_or(0.0))
        .sum();
    Some((cpc_sum / n, clicks_sum / n))
}

/// Run the three-tier source selection for a validated request.
pub async fn select_source(
    request: &EstimateRequest,
    provider: &dyn KeywordMetricsProvider,
    table: &FallbackTable,
) -> SourceSelection {
    let mut inputs = EffectiveInputs {
        cpc: request.target_cpc,
        monthly_clicks: request.estimated_monthly_clicks,
    };

    if !request.has_keywords() {
        return SourceSelection {
            inputs,
            provenance: Provenance::Defaults,
        };
    }

    if provider.is_available() {
        match provider.keyword_ideas(&request.keywords).await {
            Ok(ideas) => {
                if let Some((avg_cpc, avg_clicks)) = average_ideas(&ideas, request.target_cpc) {
                    if avg_cpc > 0.0 {
                        inputs.cpc = avg_cpc;
                    }
                    if avg_clicks > 0.0 {
                        inputs.monthly_clicks = avg_clicks;
                    }
                    debug!(
                        provider = provider.name(),
                        idea_count = ideas.len(),
                        avg_cpc,
                        avg_clicks,
                        "live_metrics_applied"
                    );
                    return SourceSelection {
                        inputs,
                        provenance: Provenance::Live {
                            idea_count: ideas.len(),
                        },
                    };
                }
                debug!(provider = provider.name(), "provider_returned_no_ideas");
            }
            Err(err) => {
                warn!(provider = provider.name(), error = %err, "provider_call_failed");
            }
        }
    } else {
        debug!(provider = provider.name(), "provider_unavailable");
    }

    let matched = table.first_match(&request.keywords).map(|(keyword, entry)| {
        inputs.cpc = entry.avg_cpc;
        inputs.monthly_clicks = entry.estimated_clicks;
        keyword.to_string()
    });

    SourceSelection {
        inputs,
        provenance: Provenance::Fallback { matched },
    }
}
