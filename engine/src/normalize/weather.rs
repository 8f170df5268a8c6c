//! Weather normalizer.
//!
//! Severity is cumulative across cities and not capped:
//! - +3 for an explicit alert string (also recorded as `"<city>: <alert>"`)
//! - +1 when the primary condition mentions rain, storm or thunder

use corelib::models::{WeatherOverview, WeatherSummary};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::snapshot::lenient;

pub const ALERT_SEVERITY: u32 = 3;
pub const WET_CONDITION_SEVERITY: u32 = 1;

const WET_MARKERS: [&str; 3] = ["rain", "storm", "thunder"];
const UNKNOWN_CONDITION: &str = "Unknown";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct WeatherSnapshot {
    /// City -> location record as returned by the weather provider.
    #[serde(default)]
    pub locations: Map<String, Value>,
}

/// The parts of a location record the normalizer reads.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
struct Location {
    #[serde(default)]
    main: Value,
    #[serde(default, deserialize_with = "lenient::list")]
    weather: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    alert: Option<String>,
}

impl Location {
    fn temp(&self) -> Option<f64> {
        self.main.get("temp").and_then(lenient::as_number)
    }

    fn condition(&self) -> String {
        self.weather
            .first()
            .and_then(|w| w.get("main"))
            .and_then(lenient::as_string)
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string())
    }
}

fn is_wet(condition: &str) -> bool {
    let c = condition.to_lowercase();
    WET_MARKERS.iter().any(|m| c.contains(m))
}

pub fn normalize(snapshot: Option<&WeatherSnapshot>) -> WeatherOverview {
    let mut overview = WeatherOverview::default();
    let Some(snapshot) = snapshot else {
        return overview;
    };

    for (city, raw) in &snapshot.locations {
        // Locations the collector failed to fetch carry an `error` key.
        if raw.get("error").is_some() {
            debug!(city = %city, "skipping location with fetch error");
            continue;
        }

        let Ok(loc) = serde_json::from_value::<Location>(raw.clone()) else {
            debug!(city = %city, "skipping malformed location record");
            continue;
        };

        let condition = loc.condition();

        if let Some(alert) = loc.alert.as_deref().filter(|a| !a.is_empty()) {
            overview.severity += ALERT_SEVERITY;
            overview.alerts.push(format!("{city}: {alert}"));
        }

        if is_wet(&condition) {
            overview.severity += WET_CONDITION_SEVERITY;
        }

        overview.summaries.push(WeatherSummary {
            city: city.clone(),
            temp: loc.temp(),
            condition,
        });
    }

    overview
}
