
use chrono::NaiveDate;
use corelib::models::{AnomalyResult, IndicatorBundle};
use engine::{EngineConfig, FileSnapshotStore, IndicatorEngine, SnapshotSource};
use mock_store::MockStore;
use serde_json::{Value, json};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn publish(store: &FileSnapshotStore, domain: &str, name: &str, value: Value) {
    store.write_atomic(domain, name, &value).unwrap();
}

/// A complete collection cycle on disk.
fn seed_full_dataset(store: &FileSnapshotStore) {
    publish(store, "cse", "summary", json!({"aspi": 12050.5, "volume": 1_200_000}));
    publish(store, "cse", "status", json!([{"status": "Market Open"}]));
    publish(
        store,
        "cse",
        "indices",
        json!([
            {"indexName": "S&P Sri Lanka 20", "value": 3900.0},
            {"indexName": "All Share Price Index", "value": "12100.25"}
        ]),
    );
    publish(
        store,
        "cse",
        "gainers",
        json!([{"symbol": "JKH"}, {"symbol": "COMB"}, {"symbol": "HNB"},
               {"symbol": "DIAL"}, {"symbol": "SAMP"}, {"symbol": "LOLC"}]),
    );
    publish(store, "cse", "losers", json!([{"symbol": "CTC"}, {"symbol": "DIST"}]));
    publish(store, "cse", "prices", json!([{}, {}, {}]));

    let headlines: Vec<Value> = (0..8)
        .map(|i| {
            let source = ["Ada Derana", "Daily Mirror", "EconomyNext"][i % 3];
            json!({"source": source, "title": format!("story {i}")})
        })
        .collect();
    publish(store, "news", "news", Value::Array(headlines));

    publish(
        store,
        "weather",
        "weather",
        json!({"locations": {
            "Colombo": {"main": {"temp": 31.2}, "weather": [{"main": "Rain", "description": "light rain"}]},
            "Kandy": {"main": {"temp": 24}, "weather": [{"main": "Clouds"}], "alert": "Landslide Warning"},
            "Jaffna": {"error": "timeout"}
        }}),
    );

    publish(
        store,
        "traffic",
        "traffic",
        json!([
            {"city": "Colombo", "congestion_percent": 75, "incident_count": 4},
            {"city": "Kandy", "congestion_percent": 25, "incident_count": 0}
        ]),
    );

    publish(store, "cbsl", "rates", json!({"rates": {"USD": {"lkr_per_unit": 302.5}}}));

    publish(
        store,
        "events",
        "events",
        json!({"nager_holidays": [
            {"date": "2025-05-12", "name": "Vesak"},
            {"date": "2025-06-10", "localName": "Poson Poya"},
            {"date": "2025-12-25", "name": "Christmas"}
        ]}),
    );
}

#[test]
fn empty_snapshots_give_zero_bundle() {
    let engine = IndicatorEngine::new(MockStore::new(), EngineConfig::default());

    let bundle = engine.build_at(today());

    assert_eq!(bundle, IndicatorBundle::default());
    assert_eq!(bundle.national_activity_score, 0);
    assert_eq!(bundle.market_volatility_percent, 0.0);
    assert_eq!(bundle.risk_score, 0);
    assert_eq!(bundle.opportunity_score, 0);
    assert_eq!(bundle.market_anomaly, AnomalyResult::new(false, 0.0));
}

#[test]
fn empty_data_dir_gives_zero_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let engine = IndicatorEngine::from_config(EngineConfig::default().with_data_dir(dir.path()));

    assert_eq!(engine.build_at(today()), IndicatorBundle::default());
}

#[test]
fn full_dataset_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path());
    seed_full_dataset(&store);

    let engine = IndicatorEngine::new(store, EngineConfig::default());
    let b = engine.build_at(today());

    // market
    assert_eq!(b.market.index, Some(12100.25));
    assert_eq!(b.market.gainers_count, 6);
    assert_eq!(b.market.losers_count, 2);
    assert_eq!(b.market.prices_count, 3);
    assert_eq!(b.market.status["status"], "Market Open");

    // news
    assert_eq!(b.news.headline_count, 8);
    assert_eq!(b.news.sources.len(), 3);
    assert_eq!(b.news.latest.len(), 5);

    // weather: Rain (+1), Landslide alert (+3), Jaffna skipped
    assert_eq!(b.weather.severity, 4);
    assert_eq!(b.weather.alerts, vec!["Kandy: Landslide Warning".to_string()]);
    assert_eq!(b.weather.summaries.len(), 2);

    // traffic
    assert_eq!(b.traffic.avg_congestion, 50.0);
    assert_eq!(b.traffic.high_congestion_count, 1);

    assert_eq!(b.currency.usd_rate, 302.5);

    // events: Vesak is past
    assert_eq!(b.events.count, 3);
    let names: Vec<_> = b.events.upcoming.iter().map(|e| e.name.clone()).collect();
    assert_eq!(
        names,
        vec![Some("Poson Poya".to_string()), Some("Christmas".to_string())]
    );

    // scores
    assert_eq!(b.national_activity_score, 40);
    assert_eq!(b.market_volatility_percent, 25.0);
    // 4*10 + 50*0.2 + 25*0.2 + 40*0.1 + 10 (USD) = 69
    assert_eq!(b.risk_score, 69);
    // 30 (gainers) + 20 (events)
    assert_eq!(b.opportunity_score, 50);

    // one index point: short history, nothing to compare
    assert_eq!(b.market_anomaly, AnomalyResult::new(false, 0.0));
    assert_eq!(b.market_trend_percent, 0.0);
}

#[test]
fn malformed_snapshots_degrade_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path());
    seed_full_dataset(&store);

    // torn write of the news feed, wrong shapes elsewhere
    std::fs::write(store.path_for("news", "news"), br#"[{"source": "Ada"#).unwrap();
    publish(&store, "traffic", "traffic", json!({"city": "Colombo"}));
    publish(&store, "cbsl", "rates", json!({"rates": {"USD": {"lkr_per_unit": "n/a"}}}));

    assert!(store.read("news", "news").is_none());

    let b = IndicatorEngine::new(store, EngineConfig::default()).build_at(today());

    assert_eq!(b.news.headline_count, 0);
    assert_eq!(b.traffic.avg_congestion, 0.0);
    assert_eq!(b.currency.usd_rate, 0.0);

    // the remaining domains are unaffected
    assert_eq!(b.weather.severity, 4);
    assert_eq!(b.market.gainers_count, 6);
    // 4*10 + 25*0.2 = 45
    assert_eq!(b.risk_score, 45);
}

#[test]
fn spike_after_index_history_is_flagged() {
    let history: Vec<f64> = (0..11).map(|i| 10_000.0 + i as f64 * 5.0).collect();
    let store = MockStore::new()
        .with("cse", "index_history", json!(history))
        .with("cse", "summary", json!({"aspi": 12_000.0}));

    let engine = IndicatorEngine::new(store, EngineConfig::default());
    let first = engine.build_at(today());
    let second = engine.build_at(today());

    assert!(first.market_anomaly.detected);
    assert!(first.market_anomaly.score < 0.0);
    assert_eq!(first.market_anomaly, second.market_anomaly);
    // the anomaly adds 20 to risk; activity and volatility are 0
    assert_eq!(first.risk_score, 20);
}

#[test]
fn extreme_index_history_still_builds() {
    let mut history = vec![1e308; 6];
    history.extend([-1e308; 6]);
    let store = MockStore::new().with("cse", "index_history", json!(history));

    let b = IndicatorEngine::new(store, EngineConfig::default()).build_at(today());

    assert!(b.market_anomaly.score.is_finite());
    assert!(b.risk_score <= 100);
}

#[test]
fn short_history_jump_is_flagged() {
    let store = MockStore::new()
        .with("cse", "index_history", json!([100.0]))
        .with("cse", "summary", json!({"ASPI": "106"}));

    let b = IndicatorEngine::new(store, EngineConfig::default()).build_at(today());

    assert_eq!(b.market_anomaly, AnomalyResult::new(true, 6.0));
}

#[test]
fn bundle_json_uses_domain_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path());
    seed_full_dataset(&store);

    let b = IndicatorEngine::new(store, EngineConfig::default()).build_at(today());
    let v = serde_json::to_value(&b).unwrap();

    assert_eq!(v["cse"]["gainers_count"], 6);
    assert_eq!(v["cbsl"]["usd_rate"], 302.5);
    assert_eq!(v["risk_score"], 69);
    assert_eq!(v["market_anomaly"]["detected"], false);
}
