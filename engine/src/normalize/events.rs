//! Public events normalizer.
//!
//! Dates are `YYYY-MM-DD` strings; fixed width and zero padding make the
//! lexicographic comparison against today's UTC date a chronological one.

use chrono::NaiveDate;
use corelib::models::{EventsOverview, UpcomingEvent};
use serde::Deserialize;
use serde_json::Value;

use crate::snapshot::lenient;

/// Upcoming entries kept, in source order.
pub const UPCOMING_LIMIT: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EventsSnapshot {
    #[serde(default, deserialize_with = "lenient::list")]
    pub nager_holidays: Vec<Value>,

    /// Used only when `nager_holidays` is empty.
    #[serde(default, deserialize_with = "lenient::list")]
    pub fallback: Vec<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
struct Holiday {
    #[serde(default, deserialize_with = "lenient::string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    name: Option<String>,
    #[serde(default, rename = "localName", deserialize_with = "lenient::string")]
    local_name: Option<String>,
}

impl EventsSnapshot {
    fn holidays(&self) -> &[Value] {
        if self.nager_holidays.is_empty() {
            &self.fallback
        } else {
            &self.nager_holidays
        }
    }
}

pub fn normalize(snapshot: Option<&EventsSnapshot>, today: NaiveDate) -> EventsOverview {
    let Some(snapshot) = snapshot else {
        return EventsOverview::default();
    };

    let holidays = snapshot.holidays();
    let today = today.format("%Y-%m-%d").to_string();

    let upcoming = holidays
        .iter()
        .filter_map(|raw| serde_json::from_value::<Holiday>(raw.clone()).ok())
        .filter_map(|h| {
            let date = h.date?;
            (date.as_str() >= today.as_str()).then(|| UpcomingEvent {
                name: h.name.or(h.local_name),
                date,
            })
        })
        .take(UPCOMING_LIMIT)
        .collect();

    EventsOverview {
        upcoming,
        count: holidays.len(),
    }
}
