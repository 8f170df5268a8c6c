//! Market (equities exchange) normalizer.
//!
//! The exchange collector publishes six separate documents: `summary`,
//! `status`, `prices`, `gainers`, `losers` and `indices`. They are gathered
//! into a [`MarketSnapshot`] and reduced to a [`MarketOverview`].
//!
//! ## Index resolution
//! 1. the first `indices` entry whose name contains `ASPI` or `All Share`
//!    and whose value parses as a number
//! 2. else the first of [`SUMMARY_INDEX_KEYS`] in `summary` holding a number
//! 3. else absent

use corelib::models::MarketOverview;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::snapshot::{Document, decode, keys, lenient};
use crate::store::SnapshotSource;

/// Summary keys probed, in order, when no index entry matches.
pub const SUMMARY_INDEX_KEYS: [&str; 4] = ["aspi", "ASPI", "marketIndex", "index"];

const INDEX_NAME_MARKERS: [&str; 2] = ["ASPI", "All Share"];

/// One row of the `indices` document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct IndexEntry {
    #[serde(
        default,
        rename = "indexName",
        alias = "name",
        deserialize_with = "lenient::string"
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub value: Option<f64>,
}

impl IndexEntry {
    fn is_all_share(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| INDEX_NAME_MARKERS.iter().any(|m| n.contains(m)))
    }
}

/// All market documents of one collection cycle. Missing documents are empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketSnapshot {
    pub summary: Map<String, Value>,
    pub status: Map<String, Value>,
    pub prices: Vec<Value>,
    pub gainers: Vec<Value>,
    pub losers: Vec<Value>,
    pub indices: Vec<IndexEntry>,
}

impl MarketSnapshot {
    pub fn load<S: SnapshotSource + ?Sized>(source: &S) -> Self {
        let record = |name: &str| {
            decode::<Document>(keys::CSE, name, source.read(keys::CSE, name))
                .map(Document::into_record)
                .unwrap_or_default()
        };
        let rows = |name: &str| {
            decode::<Vec<Value>>(keys::CSE, name, source.read(keys::CSE, name)).unwrap_or_default()
        };

        let indices = rows(keys::CSE_INDICES)
            .into_iter()
            .filter_map(|row| serde_json::from_value::<IndexEntry>(row).ok())
            .collect();

        Self {
            summary: record(keys::CSE_SUMMARY),
            status: record(keys::CSE_STATUS),
            prices: rows(keys::CSE_PRICES),
            gainers: rows(keys::CSE_GAINERS),
            losers: rows(keys::CSE_LOSERS),
            indices,
        }
    }
}

pub fn normalize(snapshot: MarketSnapshot) -> MarketOverview {
    let index = resolve_index(&snapshot.indices, &snapshot.summary);
    if index.is_none() {
        debug!("no market index found in indices or summary");
    }

    MarketOverview {
        index,
        gainers_count: snapshot.gainers.len(),
        losers_count: snapshot.losers.len(),
        prices_count: snapshot.prices.len(),
        status: snapshot.status,
        summary: snapshot.summary,
        gainers: snapshot.gainers,
        losers: snapshot.losers,
        prices: snapshot.prices,
    }
}

fn resolve_index(indices: &[IndexEntry], summary: &Map<String, Value>) -> Option<f64> {
    indices
        .iter()
        .filter(|e| e.is_all_share())
        .find_map(|e| e.value)
        .or_else(|| {
            SUMMARY_INDEX_KEYS
                .iter()
                .find_map(|k| summary.get(*k).and_then(lenient::as_number))
        })
}
