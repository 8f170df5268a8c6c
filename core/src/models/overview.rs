use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Equities exchange summary.
///
/// Counts are always the length of the corresponding list, never estimated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    /// All Share Price Index, when it could be resolved.
    pub index: Option<f64>,

    pub gainers_count: usize,
    pub losers_count: usize,
    pub prices_count: usize,

    pub status: Map<String, Value>,
    pub summary: Map<String, Value>,

    pub gainers: Vec<Value>,
    pub losers: Vec<Value>,
    pub prices: Vec<Value>,
}

impl MarketOverview {
    /// Number of recorded market moves (gainers plus losers).
    pub fn total_moves(&self) -> usize {
        self.gainers_count + self.losers_count
    }
}

/// One news item as exposed to the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub source: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub sentiment_score: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsOverview {
    pub headline_count: usize,
    pub sources: BTreeSet<String>,
    /// At most five items, in feed order.
    pub latest: Vec<Headline>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub city: String,
    pub temp: Option<f64>,
    pub condition: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherOverview {
    /// Cumulative across cities, not capped.
    pub severity: u32,
    pub alerts: Vec<String>,
    pub summaries: Vec<WeatherSummary>,
}

impl WeatherOverview {
    /// At least one location reported without error.
    pub fn is_reported(&self) -> bool {
        !self.summaries.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficOverview {
    /// Mean congestion in [0, 100].
    pub avg_congestion: f64,
    pub high_congestion_count: usize,
    /// Number of records the average was taken over; 0 when unreported.
    pub reporting_cities: usize,
    pub details: Vec<String>,
}

impl TrafficOverview {
    pub fn is_reported(&self) -> bool {
        self.reporting_cities > 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyOverview {
    /// LKR per USD, 0 when unknown.
    pub usd_rate: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub name: Option<String>,
    pub date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsOverview {
    /// At most ten entries, in source order.
    pub upcoming: Vec<UpcomingEvent>,
    /// Size of the holiday list the entries were selected from.
    pub count: usize,
}
