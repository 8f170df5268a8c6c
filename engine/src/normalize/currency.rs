//! Currency normalizer: LKR per USD from the central bank rates snapshot.

use corelib::models::CurrencyOverview;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::snapshot::lenient;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CurrencySnapshot {
    /// Currency code -> `{lkr_per_unit, ...}`.
    #[serde(default)]
    pub rates: Map<String, Value>,
}

pub fn normalize(snapshot: Option<&CurrencySnapshot>) -> CurrencyOverview {
    let usd_rate = snapshot
        .and_then(|s| s.rates.get("USD"))
        .and_then(|usd| usd.get("lkr_per_unit"))
        .and_then(lenient::as_number)
        .filter(|r| *r >= 0.0)
        .unwrap_or(0.0);

    CurrencyOverview { usd_rate }
}
