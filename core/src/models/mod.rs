//! Shared data model produced by the indicator engine and consumed by the
//! presentation layer.
//!
//! Every value here is rebuilt from scratch on each cycle and never mutated
//! after construction.

pub mod bundle;
pub mod overview;
pub mod signal;

pub use bundle::{IndicatorBundle, ScoreCard};
pub use overview::{
    CurrencyOverview, EventsOverview, Headline, MarketOverview, NewsOverview, TrafficOverview,
    UpcomingEvent, WeatherOverview, WeatherSummary,
};
pub use signal::{AnomalyResult, TrendResult};
