use serde::{Deserialize, Serialize};

use super::overview::{
    CurrencyOverview, EventsOverview, MarketOverview, NewsOverview, TrafficOverview,
    WeatherOverview,
};
use super::signal::{AnomalyResult, TrendResult};

/// Headline scores derived from all domain overviews.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// 0..=100
    pub national_activity_score: u8,

    /// Share of losers among all market moves, 0..=100.
    ///
    /// Despite the name this is a bearishness ratio, not a statistical
    /// variance of prices.
    pub market_volatility_percent: f64,

    /// 0..=100
    pub risk_score: u8,

    /// 0..=100
    pub opportunity_score: u8,

    /// Index trend carried through from the composer input.
    pub market_trend_percent: TrendResult,
}

/// Aggregate result handed to the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub national_activity_score: u8,
    pub market_volatility_percent: f64,
    pub risk_score: u8,
    pub opportunity_score: u8,
    pub market_trend_percent: TrendResult,

    #[serde(rename = "cse")]
    pub market: MarketOverview,
    pub news: NewsOverview,
    pub weather: WeatherOverview,
    pub traffic: TrafficOverview,
    #[serde(rename = "cbsl")]
    pub currency: CurrencyOverview,
    pub events: EventsOverview,

    pub market_anomaly: AnomalyResult,
}

impl IndicatorBundle {
    pub fn scores(&self) -> ScoreCard {
        ScoreCard {
            national_activity_score: self.national_activity_score,
            market_volatility_percent: self.market_volatility_percent,
            risk_score: self.risk_score,
            opportunity_score: self.opportunity_score,
            market_trend_percent: self.market_trend_percent,
        }
    }
}
