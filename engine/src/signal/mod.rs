//! Market signals derived from the index series.
//!
//! Both signals are side-effect-free functions of an ordered series (oldest
//! first) and never fail: short series take explicit fallback branches.

pub mod anomaly;
pub mod trend;

pub use anomaly::AnomalyDetector;
pub use trend::rolling_trend;
