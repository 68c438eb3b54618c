use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

use navistore::config::RuntimeConfig;
use navistore::logging::init_tracing;
use navistore::presentation::{
    fallback_delay, LifecycleAction, PresentationLifecycle, PresentationState,
    PresentationStatus,
};
use navistore::Store;

/// Play a scripted show/hide scenario through a presentation lifecycle.
#[derive(Debug, Parser)]
#[command(name = "navistore", version)]
struct Cli {
    /// Config file (default: ~/.config/navistore/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the enter animation duration in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Number of show/hide cycles to play
    #[arg(long, default_value_t = 1)]
    cycles: u32,

    /// Content presented on each cycle
    #[arg(long, default_value = "sheet")]
    content: String,
}

type Lifecycle = PresentationLifecycle<String>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load_from(path),
        None => RuntimeConfig::load(),
    }
    .context("loading configuration")?;
    init_tracing(&config.logging);

    let duration = cli
        .duration_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.presentation.default_duration());
    let lifecycle = Lifecycle::new(config.presentation.lifecycle("demo"));
    let limit = phase_limit(
        duration.max(lifecycle.config().dismiss_duration().unwrap_or(duration)),
        lifecycle.config().timeout_multiplier(),
    );

    let store = Store::new(lifecycle, PresentationState::idle(), ())?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _subscription = store.subscribe(move |state: &PresentationState<String>| {
        println!(
            "{:<10} content={}",
            state.status().to_string(),
            state.content().map(String::as_str).unwrap_or("-")
        );
        let _ = tx.send(state.status());
    });

    for cycle in 1..=cli.cycles {
        tracing::info!(cycle, "Starting cycle");
        store.dispatch(LifecycleAction::show(cli.content.clone(), duration))?;
        wait_for(&mut rx, PresentationStatus::Presented, limit).await?;

        store.dispatch(LifecycleAction::Hide)?;
        wait_for(&mut rx, PresentationStatus::Idle, limit).await?;
    }

    store.shutdown();
    Ok(())
}

/// Longest a phase of `duration` may take, with some slack after the fallback.
fn phase_limit(duration: Duration, multiplier: f64) -> Duration {
    fallback_delay(duration, multiplier).saturating_add(Duration::from_millis(100))
}

async fn wait_for(
    rx: &mut mpsc::UnboundedReceiver<PresentationStatus>,
    target: PresentationStatus,
    limit: Duration,
) -> Result<()> {
    let reached = tokio::time::timeout(limit, async {
        while let Some(status) = rx.recv().await {
            if status == target {
                return true;
            }
        }
        false
    })
    .await;

    match reached {
        Ok(true) => Ok(()),
        Ok(false) => bail!("store closed before reaching {}", target),
        Err(_) => bail!("timed out waiting for {}", target),
    }
}
