//! Indicator Bundle Builder
//!
//! Reads every domain snapshot, normalizes it, runs the market signals and
//! composes the scores into one [`IndicatorBundle`]. A build never fails:
//! degraded or missing domains show up as zero-value overviews.

use chrono::{NaiveDate, Utc};
use corelib::models::{IndicatorBundle, MarketOverview};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::compose::{ScoreInputs, compose};
use crate::config::EngineConfig;
use crate::normalize::{
    self, CurrencySnapshot, EventsSnapshot, MarketSnapshot, NewsSnapshot, TrafficSnapshot,
    WeatherSnapshot,
};
use crate::signal::{AnomalyDetector, rolling_trend};
use crate::snapshot::{decode, keys, lenient};
use crate::store::{FileSnapshotStore, SnapshotSource};

pub struct IndicatorEngine<S> {
    source: S,
    config: EngineConfig,
    detector: AnomalyDetector,
}

impl IndicatorEngine<FileSnapshotStore> {
    /// Engine over the on-disk store rooted at `config.data_dir`.
    pub fn from_config(config: EngineConfig) -> Self {
        let store = FileSnapshotStore::from_config(&config);
        Self::new(store, config)
    }
}

impl<S: SnapshotSource> IndicatorEngine<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        let detector = AnomalyDetector::new(config.anomaly.clone());
        Self {
            source,
            config,
            detector,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build the bundle for the current UTC date.
    pub fn build(&self) -> IndicatorBundle {
        self.build_at(Utc::now().date_naive())
    }

    /// Build the bundle as of `today`, which decides which events are upcoming.
    #[instrument(skip(self))]
    pub fn build_at(&self, today: NaiveDate) -> IndicatorBundle {
        let market = self.market_overview();
        let news = normalize::news::normalize(self.load::<NewsSnapshot>(keys::NEWS));
        let weather =
            normalize::weather::normalize(self.load::<WeatherSnapshot>(keys::WEATHER).as_ref());
        let traffic = normalize::traffic::normalize(
            self.load::<TrafficSnapshot>(keys::TRAFFIC).as_deref(),
        );
        let currency =
            normalize::currency::normalize(self.load::<CurrencySnapshot>(keys::CURRENCY).as_ref());
        let events = normalize::events::normalize(
            self.load::<EventsSnapshot>(keys::EVENTS).as_ref(),
            today,
        );

        let series = self.index_series(&market);
        let trend = rolling_trend(&series, self.config.trend_window);
        let anomaly = self.detector.detect(&series);

        let scores = compose(&ScoreInputs {
            market: &market,
            news: &news,
            weather: &weather,
            traffic: &traffic,
            currency: &currency,
            events: &events,
            anomaly: &anomaly,
            trend: Some(trend),
        });

        info!(
            activity = scores.national_activity_score,
            volatility = scores.market_volatility_percent,
            risk = scores.risk_score,
            opportunity = scores.opportunity_score,
            anomaly = anomaly.detected,
            "indicator bundle built"
        );

        IndicatorBundle {
            national_activity_score: scores.national_activity_score,
            market_volatility_percent: scores.market_volatility_percent,
            risk_score: scores.risk_score,
            opportunity_score: scores.opportunity_score,
            market_trend_percent: scores.market_trend_percent,
            market,
            news,
            weather,
            traffic,
            currency,
            events,
            market_anomaly: anomaly,
        }
    }

    pub fn market_overview(&self) -> MarketOverview {
        normalize::market::normalize(MarketSnapshot::load(&self.source))
    }

    /// Index history (oldest first) followed by the current index, if any.
    ///
    /// History entries that are not numbers are dropped.
    pub fn index_series(&self, market: &MarketOverview) -> Vec<f64> {
        let history: Vec<Value> = decode(
            keys::CSE,
            keys::CSE_INDEX_HISTORY,
            self.source.read(keys::CSE, keys::CSE_INDEX_HISTORY),
        )
        .unwrap_or_default();

        let mut series: Vec<f64> = history.iter().filter_map(lenient::as_number).collect();
        if series.len() != history.len() {
            debug!(
                dropped = history.len() - series.len(),
                "non-numeric index history entries dropped"
            );
        }

        series.extend(market.index);
        series
    }

    fn load<T: serde::de::DeserializeOwned>(&self, (domain, name): (&str, &str)) -> Option<T> {
        decode(domain, name, self.source.read(domain, name))
    }
}
