//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::CaptureConfig;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    stream: StreamInfo,
    preset: String,
    tuning: TuningInfo,
    retry: RetryInfo,
}

#[derive(Serialize)]
struct StreamInfo {
    depth_width: u32,
    depth_height: u32,
    color_width: u32,
    color_height: u32,
    framerate: u32,
    wait_timeout_ms: u64,
    validation: String,
}

#[derive(Serialize)]
struct TuningInfo {
    enabled: bool,
    initial_interval_ms: u64,
    interval_step_ms: u64,
    settle_ms: u64,
}

#[derive(Serialize)]
struct RetryInfo {
    max_retries: u32,
    delay_ms: u64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&config);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn build_config_info(config: &CaptureConfig) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", config.version),
        stream: StreamInfo {
            depth_width: config.stream.depth_width,
            depth_height: config.stream.depth_height,
            color_width: config.stream.color_width,
            color_height: config.stream.color_height,
            framerate: config.stream.framerate,
            wait_timeout_ms: config.stream.wait_timeout_ms,
            validation: format!("{:?}", config.stream.validation),
        },
        preset: config.preset.name.clone(),
        tuning: TuningInfo {
            enabled: config.tuning.enabled,
            initial_interval_ms: config.tuning.initial_interval_ms,
            interval_step_ms: config.tuning.interval_step_ms,
            settle_ms: config.tuning.settle_ms,
        },
        retry: RetryInfo {
            max_retries: config.retry.max_retries,
            delay_ms: config.retry.delay_ms,
        },
    }
}

fn print_config_info(config: &CaptureConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               RGB-D Capture Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📷 Streams");
    println!("   ├─ Version: {:?}", config.version);
    println!(
        "   ├─ Depth: {}x{} @ {} fps",
        config.stream.depth_width, config.stream.depth_height, config.stream.framerate
    );
    println!(
        "   ├─ Color: {}x{} @ {} fps",
        config.stream.color_width, config.stream.color_height, config.stream.framerate
    );
    println!("   ├─ Frame wait timeout: {} ms", config.stream.wait_timeout_ms);
    println!("   └─ Validation: {:?}", config.stream.validation);

    println!("\n🎛  Startup");
    println!("   └─ Visual preset: {}", config.preset.name);

    println!("\n🔄 Tuning");
    if config.tuning.enabled {
        println!("   ├─ Initial interval: {} ms", config.tuning.initial_interval_ms);
        println!("   ├─ Interval step: {} ms", config.tuning.interval_step_ms);
        println!("   └─ Settle delay: {} ms", config.tuning.settle_ms);
    } else {
        println!("   └─ Disabled");
    }

    println!("\n♻️  Retry");
    println!("   ├─ Max retries: {}", config.retry.max_retries);
    println!("   └─ Delay: {} ms", config.retry.delay_ms);

    println!();
}
