//! Dashboard projections of an [`IndicatorBundle`].

use chrono::{DateTime, SecondsFormat, Utc};
use corelib::models::{IndicatorBundle, MarketOverview};
use serde::Serialize;
use serde_json::{Map, Value};

/// Volatility above this percentage is reported as market stress.
const MARKET_STRESS_PERCENT: f64 = 60.0;

/// Opportunity score above which conditions are called favourable.
const FAVOURABLE_OPPORTUNITY: u8 = 50;

#[derive(Debug, Serialize)]
pub struct RawCounts {
    pub news: usize,
    pub weather_alerts: usize,
    pub cse_gainers: usize,
}

#[derive(Debug, Serialize)]
pub struct SignalsView<'a> {
    #[serde(flatten)]
    pub bundle: &'a IndicatorBundle,
    pub raw_counts: RawCounts,
}

/// Score in [0, 1] with the reasons behind it.
#[derive(Debug, PartialEq, Serialize)]
pub struct FactorView {
    pub score: f64,
    pub factors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MarketView<'a> {
    pub summary: &'a Map<String, Value>,
    pub status: &'a Map<String, Value>,
    pub gainers: &'a [Value],
    pub losers: &'a [Value],
    pub prices: &'a [Value],
}

#[derive(Debug, PartialEq, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub time: String,
}

pub fn signals(bundle: &IndicatorBundle) -> SignalsView<'_> {
    SignalsView {
        bundle,
        raw_counts: RawCounts {
            news: bundle.news.headline_count,
            weather_alerts: bundle.weather.alerts.len(),
            cse_gainers: bundle.market.gainers_count,
        },
    }
}

pub fn risk(bundle: &IndicatorBundle) -> FactorView {
    let mut factors = bundle.weather.alerts.clone();

    if bundle.market_volatility_percent > MARKET_STRESS_PERCENT {
        factors.push(format!(
            "High Market Stress ({:.0}%)",
            bundle.market_volatility_percent
        ));
    }
    if bundle.market_anomaly.detected {
        factors.push("Market Anomaly Detected".to_string());
    }

    FactorView {
        score: f64::from(bundle.risk_score) / 100.0,
        factors,
    }
}

pub fn opportunities(bundle: &IndicatorBundle) -> FactorView {
    let mut factors = Vec::new();
    if bundle.opportunity_score > FAVOURABLE_OPPORTUNITY {
        factors.push("Favorable Market Conditions".to_string());
    }

    FactorView {
        score: f64::from(bundle.opportunity_score) / 100.0,
        factors,
    }
}

pub fn market(overview: &MarketOverview) -> MarketView<'_> {
    MarketView {
        summary: &overview.summary,
        status: &overview.status,
        gainers: &overview.gainers,
        losers: &overview.losers,
        prices: &overview.prices,
    }
}

pub fn health(now: DateTime<Utc>) -> HealthView {
    HealthView {
        status: "ok",
        time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use corelib::models::{AnomalyResult, NewsOverview, WeatherOverview};
    use serde_json::json;

    fn bundle() -> IndicatorBundle {
        IndicatorBundle {
            risk_score: 69,
            opportunity_score: 50,
            market_volatility_percent: 25.0,
            news: NewsOverview {
                headline_count: 8,
                ..Default::default()
            },
            weather: WeatherOverview {
                severity: 3,
                alerts: vec!["Kandy: Landslide Warning".into()],
                summaries: Vec::new(),
            },
            market: MarketOverview {
                gainers_count: 1,
                gainers: vec![json!({"symbol": "JKH"})],
                summary: json!({"aspi": 12000}).as_object().cloned().unwrap(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn signals_adds_raw_counts_to_the_bundle() {
        let v = serde_json::to_value(signals(&bundle())).unwrap();

        assert_eq!(
            v["raw_counts"],
            json!({"news": 8, "weather_alerts": 1, "cse_gainers": 1})
        );
        assert_eq!(v["risk_score"], 69);
        assert_eq!(v["cse"]["gainers_count"], 1);
    }

    #[test]
    fn risk_lists_alerts_only_when_market_is_calm() {
        let r = risk(&bundle());

        assert!((r.score - 0.69).abs() < 1e-12);
        assert_eq!(r.factors, vec!["Kandy: Landslide Warning".to_string()]);
    }

    #[test]
    fn risk_reports_stress_and_anomaly() {
        let b = IndicatorBundle {
            market_volatility_percent: 66.666,
            market_anomaly: AnomalyResult::new(true, -0.05),
            ..bundle()
        };

        assert_eq!(
            risk(&b).factors,
            vec![
                "Kandy: Landslide Warning".to_string(),
                "High Market Stress (67%)".to_string(),
                "Market Anomaly Detected".to_string(),
            ]
        );
    }

    #[test]
    fn opportunities_need_a_score_above_half() {
        assert!(opportunities(&bundle()).factors.is_empty());

        let b = IndicatorBundle {
            opportunity_score: 60,
            ..bundle()
        };
        let o = opportunities(&b);
        assert!((o.score - 0.6).abs() < 1e-12);
        assert_eq!(o.factors, vec!["Favorable Market Conditions".to_string()]);
    }

    #[test]
    fn market_view_passes_documents_through() {
        let b = bundle();
        let v = serde_json::to_value(market(&b.market)).unwrap();

        assert_eq!(v["summary"]["aspi"], 12000);
        assert_eq!(v["gainers"], json!([{"symbol": "JKH"}]));
        assert_eq!(v["prices"], json!([]));
        assert_eq!(v["status"], json!({}));
    }

    #[test]
    fn health_reports_utc_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();

        assert_eq!(
            health(now),
            HealthView {
                status: "ok",
                time: "2025-06-01T08:30:00.000Z".into(),
            }
        );
    }
}
