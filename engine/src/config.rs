use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

/// Parameters of the market anomaly detector.
#[derive(Clone, Debug, PartialEq)]
pub struct AnomalyConfig {
    /// Series shorter than this use the last-move threshold rule instead of
    /// the isolation forest.
    pub min_history: usize,

    /// Relative move (fraction of the previous value) above which the
    /// short-history rule flags an anomaly.
    pub relative_threshold: f64,

    // =========================
    // Isolation forest
    // =========================
    /// Assumed share of outliers in the series. Calibrates the decision
    /// threshold as this percentile of the training scores.
    pub contamination: f64,

    /// Number of isolation trees.
    pub n_estimators: usize,

    /// Upper bound on the per-tree subsample size.
    pub max_samples: usize,

    /// RNG seed. The same series and seed always give the same result.
    pub seed: u64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_history: 10,
            relative_threshold: 0.05,
            contamination: 0.05,
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Root directory holding one sub-directory per domain, each with
    /// `<name>_latest.json` snapshots written by the collectors.
    pub data_dir: PathBuf,

    /// Moving-average window of the index trend estimator.
    pub trend_window: usize,

    pub anomaly: AnomalyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            trend_window: 3,
            anomaly: AnomalyConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `SITREP_*` environment variables.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let anomaly = defaults.anomaly;

        Self {
            data_dir: std::env::var("SITREP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),

            trend_window: env_or("SITREP_TREND_WINDOW", defaults.trend_window),

            anomaly: AnomalyConfig {
                seed: env_or("SITREP_ANOMALY_SEED", anomaly.seed),
                contamination: checked_contamination(
                    env_or("SITREP_ANOMALY_CONTAMINATION", anomaly.contamination),
                    anomaly.contamination,
                ),
                ..anomaly
            },
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

/// Outlier share must lie in (0, 0.5]; anything else falls back to `default`.
fn checked_contamination(value: f64, default: f64) -> f64 {
    if value > 0.0 && value <= 0.5 {
        value
    } else {
        warn!(
            key = "SITREP_ANOMALY_CONTAMINATION",
            value,
            default,
            "contamination outside (0, 0.5]; using default"
        );
        default
    }
}

fn env_or<T>(key: &'static str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, "ignoring unparsable config value");
            default
        }),
        Err(_) => default,
    }
}
