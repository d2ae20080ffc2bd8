//! Simulated Capture Example
//!
//! Demonstrates a full capture session against the simulated camera
//! host. Runs without any camera hardware.
//!
//! Run with: cargo run --bin simulated_capture [config.toml]

use std::time::Duration;

use camera_host::{FramePlan, SimulatedHost, SimulatedHostConfig};
use capture::CaptureSession;
use config_loader::ConfigLoader;
use contracts::{CancelToken, CaptureConfig, StreamConfig};
use observability::{LogFormat, ObservabilityConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Compact,
        default_log_level: "info".to_string(),
    })?;

    tracing::info!("Starting Simulated Capture Demo");

    // ==== Stage 1: Use default config or load from file ====
    let config = if let Some(path) = std::env::args().nth(1) {
        tracing::info!(path = %path, "Loading capture config");
        ConfigLoader::load_from_path(std::path::Path::new(&path))?
    } else {
        // Small geometry keeps the demo output readable
        let mut config = CaptureConfig::default();
        config.stream = StreamConfig {
            depth_width: 320,
            depth_height: 240,
            color_width: 640,
            color_height: 360,
            ..StreamConfig::default()
        };
        config.tuning.initial_interval_ms = 500;
        config.tuning.interval_step_ms = 500;
        config.tuning.settle_ms = 10;
        config
    };

    // ==== Stage 2: Build the simulated host ====
    let frame_interval = Duration::from_millis(1000 / config.stream.framerate.max(1) as u64);
    let host = SimulatedHost::new(SimulatedHostConfig {
        plan: FramePlan {
            complete_frames: Some(90),
            frame_interval,
            ..Default::default()
        },
        ..Default::default()
    });
    let stereo = host.sensor("stereo");

    // ==== Stage 3: Run the session ====
    let stats = CaptureSession::new(host, config, CancelToken::new()).run()?;

    stats.print_summary();

    if let Some(stereo) = stereo {
        tracing::info!(
            option_writes = stereo.writes().len(),
            roi_writes = stereo.roi_writes().len(),
            "Stereo sensor mutation log"
        );
    }

    tracing::info!("Demo finished");
    Ok(())
}
