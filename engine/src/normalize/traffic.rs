//! Traffic normalizer.

use corelib::models::TrafficOverview;
use serde::Deserialize;
use serde_json::Value;

use crate::snapshot::lenient;

/// Congestion above this percentage counts as high.
pub const HIGH_CONGESTION_PERCENT: f64 = 60.0;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TrafficRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,

    /// Missing or non-numeric values count as 0.
    #[serde(default, deserialize_with = "lenient::number")]
    pub congestion_percent: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub incident_count: Option<f64>,
}

impl TrafficRecord {
    /// Non-record items count as a city with no reported congestion.
    pub fn from_item(item: &Value) -> Self {
        TrafficRecord::deserialize(item).unwrap_or_default()
    }

    fn congestion(&self) -> f64 {
        self.congestion_percent.unwrap_or(0.0)
    }
}

/// One item per city, as produced by the traffic collector. Items are
/// decoded one by one so a malformed city does not drop the others.
pub type TrafficSnapshot = Vec<Value>;

pub fn normalize(snapshot: Option<&[Value]>) -> TrafficOverview {
    let records: Vec<TrafficRecord> = snapshot
        .unwrap_or_default()
        .iter()
        .map(TrafficRecord::from_item)
        .collect();
    if records.is_empty() {
        return TrafficOverview::default();
    }

    let total: f64 = records.iter().map(TrafficRecord::congestion).sum();

    let details: Vec<String> = records
        .iter()
        .filter(|r| r.congestion() > HIGH_CONGESTION_PERCENT)
        .map(|r| {
            format!(
                "High traffic in {} ({}%)",
                r.city.as_deref().unwrap_or("Unknown"),
                r.congestion()
            )
        })
        .collect();

    TrafficOverview {
        avg_congestion: (total / records.len() as f64).clamp(0.0, 100.0),
        high_congestion_count: details.len(),
        details,
        reporting_cities: records.len(),
    }
}
