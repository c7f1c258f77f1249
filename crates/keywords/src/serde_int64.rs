//! Serde helper for protobuf `int64` fields.
//!
//! The Google Ads REST surface encodes `int64` as JSON strings, but some
//! proxies and older versions send plain numbers. Accept both.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Int64Repr {
    Text(String),
    Number(i64),
}

/// Deserialize an optional `int64` from either a string or a number.
pub fn option<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Int64Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Int64Repr::Number(n)) => Ok(Some(n)),
        Some(Int64Repr::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
