use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Projection of the indicator bundle to print.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Full bundle plus raw counts
    #[default]
    Signals,
    /// Risk score (0..1) and contributing factors
    Risk,
    /// Opportunity score (0..1) and factors
    Opportunities,
    /// Exchange summary, status, movers and prices
    Market,
    /// Liveness probe
    Health,
    /// Bundle exactly as built
    Bundle,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Signals => "signals",
            View::Risk => "risk",
            View::Opportunities => "opportunities",
            View::Market => "market",
            View::Health => "health",
            View::Bundle => "bundle",
        }
    }
}

#[derive(Debug, Parser)]
#[clap(name = "sitrep", version, about = "Fuse domain snapshots into situational indicators")]
pub struct Cli {
    /// Snapshot root, one sub-directory per domain
    #[clap(long, env = "SITREP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Which view to print
    #[clap(long, value_enum, default_value_t = View::Signals)]
    pub view: View,

    /// Emit logs as JSON lines instead of the pretty format
    #[clap(long)]
    pub json_logs: bool,

    /// Rebuild and print every SECONDS until interrupted
    #[clap(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub watch: Option<u64>,
}
