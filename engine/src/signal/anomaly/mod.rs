//! Anomaly Detector
//!
//! Decides whether the latest point of the market index series is abnormal.
//!
//! - Fewer than `min_history` points: the last move is compared against a
//!   relative threshold of the previous value. `score` is the absolute move.
//! - Otherwise: an isolation forest is fitted over the whole series and the
//!   last point is classified. `score` is its decision value (negative means
//!   outlier).

mod isolation_forest;

pub use isolation_forest::{ForestParams, IsolationForest};

use corelib::models::AnomalyResult;
use tracing::{debug, instrument, warn};

use crate::config::AnomalyConfig;

const EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    #[instrument(skip_all, fields(len = series.len()))]
    pub fn detect(&self, series: &[f64]) -> AnomalyResult {
        let finite: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() != series.len() {
            warn!(
                dropped = series.len() - finite.len(),
                "non-finite points removed from series"
            );
        }

        let result = if finite.len() < self.config.min_history {
            self.last_move(&finite)
        } else {
            self.forest(&finite)
        };

        debug!(detected = result.detected, score = result.score, "anomaly check");
        result
    }

    fn last_move(&self, series: &[f64]) -> AnomalyResult {
        let [.., prev, last] = series else {
            return AnomalyResult::default();
        };

        let diff = (last - prev).abs();
        let detected = diff > self.config.relative_threshold * (prev.abs() + EPSILON);
        AnomalyResult::new(detected, diff)
    }

    fn forest(&self, series: &[f64]) -> AnomalyResult {
        let Some(&last) = series.last() else {
            return AnomalyResult::default();
        };

        let params = ForestParams {
            n_estimators: self.config.n_estimators,
            max_samples: self.config.max_samples,
            contamination: self.config.contamination,
            seed: self.config.seed,
        };
        let model = IsolationForest::fit(series, &params);

        AnomalyResult::new(model.is_outlier(last), model.decision_function(last))
    }
}
