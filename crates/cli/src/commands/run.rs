//! `run` command implementation.

use anyhow::{Context, Result};
use device::ReplayConfig;
use std::time::Duration;
use tracing::info;

use crate::cli::{RunArgs, SourceKind};
use crate::pipeline::{SessionConfig, SessionRunner, SourceSetup};

/// Execute the `run` command
pub async fn run_session(args: &RunArgs) -> Result<()> {
    let blueprint = super::load_blueprint(args.config.as_deref())?;

    info!(
        site = %blueprint.site.name,
        hotspots = blueprint.site.catalog().len(),
        source = ?args.source,
        consent = ?args.consent,
        "Configuration loaded"
    );

    let source = match args.source {
        SourceKind::Mock => SourceSetup::Mock { seed: args.seed },
        SourceKind::Replay => SourceSetup::Replay {
            path: args
                .replay
                .clone()
                .context("--replay <PATH> is required with --source replay")?,
            config: ReplayConfig {
                speed_multiplier: args.replay_speed,
                loop_playback: args.replay_loop,
            },
        },
    };

    let config = SessionConfig {
        blueprint,
        source,
        consent: args.consent,
        duration: (args.duration > 0).then(|| Duration::from_secs(args.duration)),
        tick: Duration::from_millis(args.tick_ms.max(1)),
        snapshots: args.snapshots.clone(),
        auto_tap: args.auto_tap,
        online: args.online,
        metrics_port: (args.metrics_port != 0).then_some(args.metrics_port),
    };

    info!("Starting session...");
    let stats = SessionRunner::new(config)
        .run(shutdown_signal())
        .await
        .context("Session execution failed")?;

    info!(
        ticks = stats.ticks,
        samples = stats.session_metrics.total_samples,
        duration_secs = stats.duration.as_secs_f64(),
        "Session completed successfully"
    );
    stats.print_summary();

    info!("AR HUD finished");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
