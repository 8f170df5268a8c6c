//! Indicator fusion and scoring engine.
//!
//! Data flow:
//! Snapshot store -> domain normalizers -> {trend, anomaly} -> score composer -> bundle

pub mod builder;
pub mod compose;
pub mod config;
pub mod error;
pub mod normalize;
pub mod signal;
pub mod snapshot;
pub mod store;

pub use builder::IndicatorEngine;
pub use config::{AnomalyConfig, EngineConfig};
pub use error::StoreError;
pub use store::{FileSnapshotStore, SnapshotSource};
