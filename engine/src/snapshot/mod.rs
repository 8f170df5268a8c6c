//! Typed views over raw collector snapshots.
//!
//! Each domain decodes its JSON document into a typed snapshot. A document
//! whose top-level shape does not match is logged and treated as absent;
//! individual fields that have the wrong type fall back to their defaults
//! (see [`lenient`]).

pub mod lenient;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

/// `(domain, name)` keys of the snapshots the engine consumes.
pub mod keys {
    pub const CSE: &str = "cse";
    pub const CSE_SUMMARY: &str = "summary";
    pub const CSE_STATUS: &str = "status";
    pub const CSE_PRICES: &str = "prices";
    pub const CSE_GAINERS: &str = "gainers";
    pub const CSE_LOSERS: &str = "losers";
    pub const CSE_INDICES: &str = "indices";
    pub const CSE_INDEX_HISTORY: &str = "index_history";

    pub const NEWS: (&str, &str) = ("news", "news");
    pub const WEATHER: (&str, &str) = ("weather", "weather");
    pub const TRAFFIC: (&str, &str) = ("traffic", "traffic");
    pub const CURRENCY: (&str, &str) = ("cbsl", "rates");
    pub const EVENTS: (&str, &str) = ("events", "events");
}

/// Decode a raw snapshot into `T`, logging and discarding it on shape mismatch.
pub fn decode<T: DeserializeOwned>(domain: &str, name: &str, raw: Option<Value>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_value(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(domain, name, error = %e, "snapshot has unexpected shape; treating as absent");
            None
        }
    }
}

/// A document persisted either as a single record or as a list of records
/// (tabular exports write one-row tables as lists).
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Document {
    Record(Map<String, Value>),
    Records(Vec<Value>),
}

impl Document {
    /// The record itself, or the first record of a list. Empty otherwise.
    pub fn into_record(self) -> Map<String, Value> {
        match self {
            Document::Record(m) => m,
            Document::Records(rows) => rows
                .into_iter()
                .next()
                .and_then(|row| match row {
                    Value::Object(m) => Some(m),
                    _ => None,
                })
                .unwrap_or_default(),
        }
    }
}
