pub mod cli;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use common::logger::{TraceId, child_span, init_logger, root_span};
use engine::{EngineConfig, FileSnapshotStore, IndicatorEngine};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use cli::{Cli, View};

type Engine = IndicatorEngine<FileSnapshotStore>;

/// Build the bundle and serialize the requested projection.
fn render(engine: &Engine, view: View) -> anyhow::Result<String> {
    let _span = child_span("render").entered();

    let rendered = match view {
        View::Health => serde_json::to_string_pretty(&views::health(Utc::now())),
        View::Market => {
            let overview = engine.market_overview();
            serde_json::to_string_pretty(&views::market(&overview))
        }
        View::Signals => serde_json::to_string_pretty(&views::signals(&engine.build())),
        View::Risk => serde_json::to_string_pretty(&views::risk(&engine.build())),
        View::Opportunities => serde_json::to_string_pretty(&views::opportunities(&engine.build())),
        View::Bundle => serde_json::to_string_pretty(&engine.build()),
    };

    rendered.with_context(|| format!("serializing {} view", view.as_str()))
}

/// One build cycle under its own trace id. Snapshot reads are blocking file
/// I/O, so the build runs on the blocking pool.
async fn run_cycle(engine: &Arc<Engine>, view: View) -> anyhow::Result<()> {
    let trace_id = TraceId::new();
    let span = root_span("build_cycle", &trace_id);
    span.record("view", view.as_str());

    let task_engine = Arc::clone(engine);
    let task_span = span.clone();
    let output = tokio::task::spawn_blocking(move || {
        task_span.in_scope(|| render(&task_engine, view))
    })
    .await
    .context("build task panicked")??;

    println!("{output}");
    span.in_scope(|| info!(bytes = output.len(), "view printed"));
    Ok(())
}

/// Rebuild on a fixed cadence until Ctrl-C. Slow cycles skip missed ticks
/// instead of bursting to catch up.
async fn watch(engine: Arc<Engine>, view: View, every: Duration) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_cycle(&engine, view).await {
                    error!(error = ?e, view = view.as_str(), "build cycle failed");
                }
            }
            res = &mut shutdown => {
                res.context("listening for ctrl-c")?;
                info!("interrupted; stopping watch");
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger("sitrep", cli.json_logs);

    let mut config = EngineConfig::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }

    info!(
        data_dir = %config.data_dir.display(),
        view = cli.view.as_str(),
        watch_secs = ?cli.watch,
        "sitrep starting"
    );

    let engine = Arc::new(IndicatorEngine::from_config(config));

    match cli.watch {
        None => run_cycle(&engine, cli.view).await,
        Some(secs) => watch(engine, cli.view, Duration::from_secs(secs)).await,
    }
}
