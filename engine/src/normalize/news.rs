//! News normalizer.
//!
//! The feed collector persists either a flat list of headlines or a mapping
//! of source name to headline list. Both shapes are modelled explicitly.

use std::collections::{BTreeMap, BTreeSet};

use corelib::models::{Headline, NewsOverview};
use serde::Deserialize;
use serde_json::Value;

use crate::snapshot::lenient;

/// Items exposed in `NewsOverview::latest`.
pub const LATEST_LIMIT: usize = 5;

const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawHeadline {
    #[serde(default, deserialize_with = "lenient::string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub published: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sentiment_score: Option<f64>,
}

impl RawHeadline {
    /// Decode one feed item. Items that are not records count as blank
    /// headlines from an unknown source.
    pub fn from_item(item: Value) -> Self {
        serde_json::from_value(item).unwrap_or_default()
    }

    fn source_or_unknown(&self) -> String {
        self.source.clone().unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    }
}

impl From<RawHeadline> for Headline {
    fn from(raw: RawHeadline) -> Self {
        Headline {
            source: raw.source_or_unknown(),
            title: raw.title,
            link: raw.link,
            published: raw.published,
            summary: raw.summary,
            sentiment_score: raw.sentiment_score,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NewsSnapshot {
    /// Flat list in feed order; items are decoded one by one.
    Headlines(Vec<Value>),

    /// Source name -> headlines. Non-list values count as zero headlines.
    BySource(BTreeMap<String, Value>),
}

pub fn normalize(snapshot: Option<NewsSnapshot>) -> NewsOverview {
    match snapshot {
        None => NewsOverview::default(),

        Some(NewsSnapshot::Headlines(items)) => {
            let items: Vec<RawHeadline> = items.into_iter().map(RawHeadline::from_item).collect();
            NewsOverview {
                headline_count: items.len(),
                sources: items.iter().map(RawHeadline::source_or_unknown).collect(),
                latest: items
                    .into_iter()
                    .take(LATEST_LIMIT)
                    .map(Headline::from)
                    .collect(),
            }
        }

        Some(NewsSnapshot::BySource(feeds)) => NewsOverview {
            headline_count: feeds
                .values()
                .map(|v| v.as_array().map_or(0, Vec::len))
                .sum(),
            sources: feeds.into_keys().collect::<BTreeSet<_>>(),
            latest: Vec::new(),
        },
    }
}
