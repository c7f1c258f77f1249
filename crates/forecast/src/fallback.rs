//! Static keyword metrics used when live data is unavailable.
//!
//! The table maps lowercase keywords to an average CPC and an estimated monthly
//! click volume. A built-in sample set ships with the crate; deployments can
//! swap it for a JSON file in the same shape:
//!
//! ```json
//! { "keywords": { "shoes": { "avgCpc": 1.5, "estimatedClicks": 800 } } }
//! ```
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_ENTRIES: &[(&str, f64, f64)] = &[
    ("shoes", 1.5, 800.0),
    ("running shoes", 2.1, 450.0),
    ("sneakers", 1.8, 600.0),
    ("boots", 1.3, 350.0),
    ("sandals", 0.9, 300.0),
    ("laptop", 3.2, 700.0),
    ("phone case", 0.7, 1200.0),
    ("coffee", 1.1, 900.0),
    ("hotel", 2.8, 650.0),
    ("insurance", 6.5, 250.0),
];

/// Errors raised while loading a fallback table file.
#[derive(Debug, Error)]
pub enum FallbackTableError {
    #[error("failed to read fallback table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fallback table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fallback entry '{keyword}' must have positive avgCpc and estimatedClicks")]
    InvalidEntry { keyword: String },
}

/// Sample metrics for a single keyword.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEntry {
    pub avg_cpc: f64,
    pub estimated_clicks: f64,
}

#[derive(Deserialize)]
struct FallbackFile {
    keywords: HashMap<String, FallbackEntry>,
}

/// Read-only keyword → metrics lookup table.
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    entries: HashMap<String, FallbackEntry>,
}

impl FallbackTable {
    /// The sample data bundled with the crate.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|&(keyword, avg_cpc, estimated_clicks)| {
                (
                    keyword.to_string(),
                    FallbackEntry {
                        avg_cpc,
                        estimated_clicks,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Build a table from arbitrary entries. Keys are lowercased and every
    /// entry must be strictly positive so overridden inputs stay valid.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, FallbackTableError>
    where
        I: IntoIterator<Item = (K, FallbackEntry)>,
        K: AsRef<str>,
    {
        let mut table = HashMap::new();
        for (keyword, entry) in entries {
            let keyword = keyword.as_ref().to_lowercase();
            if !(is_positive(entry.avg_cpc) && is_positive(entry.estimated_clicks)) {
                return Err(FallbackTableError::InvalidEntry { keyword });
            }
            table.insert(keyword, entry);
        }
        Ok(Self { entries: table })
    }

    pub fn from_json_str(json: &str) -> Result<Self, FallbackTableError> {
        let file: FallbackFile = serde_json::from_str(json)?;
        Self::from_entries(file.keywords)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FallbackTableError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Case-insensitive lookup of a single keyword.
    pub fn lookup(&self, keyword: &str) -> Option<&FallbackEntry> {
        self.entries.get(&keyword.to_lowercase())
    }

    /// First keyword, in caller order, that has an entry. Later keywords are ignored.
    pub fn first_match<'k, S: AsRef<str>>(
        &self,
        keywords: &'k [S],
    ) -> Option<(&'k str, FallbackEntry)> {
        keywords.iter().find_map(|keyword| {
            let keyword = keyword.as_ref();
            self.lookup(keyword).map(|entry| (keyword, *entry))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
