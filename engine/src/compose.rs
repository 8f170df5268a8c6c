//! Score Composer
//!
//! Fuses the six domain overviews, the anomaly result and the index trend
//! into the four headline scores.
//!
//! ```text
//! activity   = min(100, round(headlines / 20 * 100)) (+10 when moves > 10)
//! volatility = losers / max(1, gainers + losers) * 100
//! risk       = round(severity * 10 + congestion * 0.2 + volatility * 0.2
//!                    + activity * 0.1 + usd_premium + anomaly_penalty)
//! ```
//!
//! `volatility` is a bearishness ratio (share of losers among all moves),
//! not a statistical variance. Every score is clamped to [0, 100].
//!
//! The calm-weather and light-traffic opportunity bonuses need a reporting
//! domain: with no weather or traffic data nothing is known to be calm.

use corelib::models::{
    AnomalyResult, CurrencyOverview, EventsOverview, MarketOverview, NewsOverview, ScoreCard,
    TrafficOverview, TrendResult, WeatherOverview,
};

/// Headline count at which news activity alone saturates the score.
pub const HEADLINE_SATURATION: f64 = 20.0;

/// Market moves above this count add [`BUSY_MARKET_BONUS`] to activity.
pub const BUSY_MARKET_MOVES: usize = 10;
pub const BUSY_MARKET_BONUS: f64 = 10.0;

/// LKR per USD above which currency pressure adds to risk.
pub const USD_PRESSURE_RATE: f64 = 300.0;

// Risk weights
const SEVERITY_WEIGHT: f64 = 10.0;
const CONGESTION_WEIGHT: f64 = 20.0;
const VOLATILITY_WEIGHT: f64 = 20.0;
const ACTIVITY_WEIGHT: f64 = 10.0;
const USD_PRESSURE_PENALTY: f64 = 10.0;
const ANOMALY_PENALTY: f64 = 20.0;

// Opportunity bonuses
const MORE_GAINERS_BONUS: u32 = 30;
const HIGH_ACTIVITY_BONUS: u32 = 10;
const CALM_WEATHER_BONUS: u32 = 10;
const LIGHT_TRAFFIC_BONUS: u32 = 10;
const UPCOMING_EVENTS_BONUS: u32 = 20;

const HIGH_ACTIVITY_SCORE: u8 = 50;
const LIGHT_TRAFFIC_PERCENT: f64 = 30.0;

const MAX_SCORE: f64 = 100.0;

/// Everything the composer reads, borrowed from the builder.
#[derive(Clone, Copy, Debug)]
pub struct ScoreInputs<'a> {
    pub market: &'a MarketOverview,
    pub news: &'a NewsOverview,
    pub weather: &'a WeatherOverview,
    pub traffic: &'a TrafficOverview,
    pub currency: &'a CurrencyOverview,
    pub events: &'a EventsOverview,
    pub anomaly: &'a AnomalyResult,
    pub trend: Option<TrendResult>,
}

pub fn compose(inputs: &ScoreInputs<'_>) -> ScoreCard {
    let activity = activity_score(inputs.news, inputs.market);
    let volatility = market_volatility_percent(inputs.market);

    ScoreCard {
        national_activity_score: activity,
        market_volatility_percent: volatility,
        risk_score: risk_score(
            inputs.weather,
            inputs.traffic,
            inputs.currency,
            inputs.anomaly,
            volatility,
            activity,
        ),
        opportunity_score: opportunity_score(
            inputs.market,
            inputs.weather,
            inputs.traffic,
            inputs.events,
            activity,
        ),
        market_trend_percent: inputs.trend.filter(|t| t.is_finite()).unwrap_or(0.0),
    }
}

pub fn activity_score(news: &NewsOverview, market: &MarketOverview) -> u8 {
    let mut score =
        (news.headline_count as f64 / HEADLINE_SATURATION * MAX_SCORE).round().min(MAX_SCORE);

    if market.total_moves() > BUSY_MARKET_MOVES {
        score += BUSY_MARKET_BONUS;
    }

    clamp_score(score)
}

/// Share of losers among all recorded moves, in percent. 0 without moves.
pub fn market_volatility_percent(market: &MarketOverview) -> f64 {
    let moves = market.total_moves().max(1);
    (market.losers_count as f64 / moves as f64 * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

pub fn risk_score(
    weather: &WeatherOverview,
    traffic: &TrafficOverview,
    currency: &CurrencyOverview,
    anomaly: &AnomalyResult,
    volatility_percent: f64,
    activity: u8,
) -> u8 {
    let mut risk = f64::from(weather.severity) * SEVERITY_WEIGHT
        + traffic.avg_congestion / MAX_SCORE * CONGESTION_WEIGHT
        + volatility_percent / MAX_SCORE * VOLATILITY_WEIGHT
        + f64::from(activity) / MAX_SCORE * ACTIVITY_WEIGHT;

    if currency.usd_rate > USD_PRESSURE_RATE {
        risk += USD_PRESSURE_PENALTY;
    }
    if anomaly.detected {
        risk += ANOMALY_PENALTY;
    }

    clamp_score(risk.round())
}

pub fn opportunity_score(
    market: &MarketOverview,
    weather: &WeatherOverview,
    traffic: &TrafficOverview,
    events: &EventsOverview,
    activity: u8,
) -> u8 {
    let bonuses = [
        (market.gainers_count > market.losers_count, MORE_GAINERS_BONUS),
        (activity > HIGH_ACTIVITY_SCORE, HIGH_ACTIVITY_BONUS),
        (weather.is_reported() && weather.severity == 0, CALM_WEATHER_BONUS),
        (
            traffic.is_reported() && traffic.avg_congestion < LIGHT_TRAFFIC_PERCENT,
            LIGHT_TRAFFIC_BONUS,
        ),
        (!events.upcoming.is_empty(), UPCOMING_EVENTS_BONUS),
    ];

    let score: u32 = bonuses
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, bonus)| bonus)
        .sum();

    clamp_score(f64::from(score))
}

/// NaN maps to 0.
fn clamp_score(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, MAX_SCORE) as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use corelib::models::UpcomingEvent;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]
        #[test]
        fn scores_stay_in_range(
            headlines in 0..5_000usize,
            gainers in 0..500usize,
            losers in 0..500usize,
            severity in 0..1_000u32,
            congestion in 0.0..=100.0f64,
            usd_rate in 0.0..1_000.0f64,
            detected in any::<bool>(),
            has_events in any::<bool>(),
        ) {
            let market = MarketOverview {
                gainers_count: gainers,
                losers_count: losers,
                ..Default::default()
            };
            let news = NewsOverview { headline_count: headlines, ..Default::default() };
            let weather = WeatherOverview { severity, ..Default::default() };
            let traffic = TrafficOverview { avg_congestion: congestion, ..Default::default() };
            let currency = CurrencyOverview { usd_rate };
            let events = EventsOverview {
                upcoming: if has_events {
                    vec![UpcomingEvent { name: None, date: "2099-01-01".into() }]
                } else {
                    Vec::new()
                },
                count: usize::from(has_events),
            };
            let anomaly = AnomalyResult::new(detected, 0.0);

            let card = compose(&ScoreInputs {
                market: &market,
                news: &news,
                weather: &weather,
                traffic: &traffic,
                currency: &currency,
                events: &events,
                anomaly: &anomaly,
                trend: None,
            });

            prop_assert!(card.national_activity_score <= 100);
            prop_assert!(card.risk_score <= 100);
            prop_assert!(card.opportunity_score <= 80);
            prop_assert!((0.0..=100.0).contains(&card.market_volatility_percent));

            if gainers + losers == 0 {
                prop_assert_eq!(card.market_volatility_percent, 0.0);
            }
        }
    }
}
