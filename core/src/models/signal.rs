use serde::{Deserialize, Serialize};

/// Outcome of the market anomaly check.
///
/// `score` depends on the branch that produced it: the absolute last move for
/// short histories, the isolation forest decision value otherwise (more
/// negative is more anomalous). Scores from the two branches are not
/// comparable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub detected: bool,
    pub score: f64,
}

impl AnomalyResult {
    pub fn new(detected: bool, score: f64) -> Self {
        Self { detected, score }
    }
}

/// Percent change between the last two moving-average values; 0 without
/// enough history.
pub type TrendResult = f64;
