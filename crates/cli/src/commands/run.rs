//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use camera_host::{FramePlan, SimulatedHost, SimulatedHostConfig};
use capture::CaptureSession;
use contracts::{CancelToken, CaptureConfig, ValidationMode};

use crate::cli::RunArgs;
use crate::error::CliError;

/// Execute the `run` command
pub async fn run_capture(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if args.relaxed {
        info!("Overriding validation mode: relaxed");
        config.stream.validation = ValidationMode::Relaxed;
    }
    if args.no_tuning {
        info!("Overriding tuning: disabled");
        config.tuning.enabled = false;
    }

    info!(
        depth = format!("{}x{}", config.stream.depth_width, config.stream.depth_height),
        color = format!("{}x{}", config.stream.color_width, config.stream.color_height),
        framerate = config.stream.framerate,
        tuning = config.tuning.enabled,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    let max_frames = (args.max_frames > 0).then_some(args.max_frames);
    let timeout = (args.timeout > 0).then(|| Duration::from_secs(args.timeout));

    let cancel = CancelToken::new();

    // Setup graceful shutdown handler
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Received shutdown signal, stopping capture...");
        signal_cancel.cancel();
    });

    if let Some(timeout) = timeout {
        let timeout_cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!(timeout_secs = timeout.as_secs(), "Session timeout reached");
            timeout_cancel.cancel();
        });
    }

    let host = build_host(&config);
    let session = CaptureSession::new(host, config, cancel).with_max_frames(max_frames);

    info!("Starting capture session...");

    // The capture loop is blocking; keep it off the async runtime workers.
    let stats = tokio::task::spawn_blocking(move || session.run())
        .await
        .context("Capture task panicked")?
        .context("Capture session failed")?;

    info!(
        frames_captured = stats.frames_captured,
        tuning_sweeps = stats.tuning_sweeps,
        duration_secs = stats.duration.as_secs_f64(),
        fps = format!("{:.2}", stats.fps()),
        "Capture session completed"
    );

    stats.print_summary();

    info!("RGB-D Capture finished");
    Ok(())
}

/// Build the simulated backend, pacing frames at the configured rate
fn build_host(config: &CaptureConfig) -> SimulatedHost {
    let frame_interval = Duration::from_millis(1000 / config.stream.framerate.max(1) as u64);
    SimulatedHost::new(SimulatedHostConfig {
        plan: FramePlan {
            frame_interval,
            ..Default::default()
        },
        ..Default::default()
    })
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &CaptureConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Streams:");
    println!(
        "  Depth: {}x{} @ {} fps",
        config.stream.depth_width, config.stream.depth_height, config.stream.framerate
    );
    println!(
        "  Color: {}x{} @ {} fps",
        config.stream.color_width, config.stream.color_height, config.stream.framerate
    );
    println!("  Frame wait timeout: {} ms", config.stream.wait_timeout_ms);
    println!("  Validation: {:?}", config.stream.validation);

    println!("\nPreset: {}", config.preset.name);

    println!("\nTuning:");
    if config.tuning.enabled {
        println!("  Initial interval: {} ms", config.tuning.initial_interval_ms);
        println!("  Interval step: {} ms", config.tuning.interval_step_ms);
        println!("  Settle delay: {} ms", config.tuning.settle_ms);
    } else {
        println!("  Disabled");
    }

    println!("\nRetry:");
    println!("  Max retries: {}", config.retry.max_retries);
    println!("  Delay: {} ms", config.retry.delay_ms);

    println!();
}
