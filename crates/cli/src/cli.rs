//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// RGB-D Capture - Depth + color capture pipeline with periodic tuning
#[derive(Parser, Debug)]
#[command(
    name = "rgbd-capture",
    author,
    version,
    about = "RGB-D camera capture pipeline",
    long_about = "A depth + color capture pipeline for RGB-D cameras.\n\n\
                  Opens a single connected device, applies the configured visual \n\
                  preset and illumination, then streams coordinated frame pairs \n\
                  while periodically re-tuning exposure and metering."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "RGBD_CAPTURE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "RGBD_CAPTURE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the capture session
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "RGBD_CAPTURE_CONFIG"
    )]
    pub config: PathBuf,

    /// Maximum number of frame pairs to capture (0 = unlimited)
    #[arg(long, default_value = "0", env = "RGBD_CAPTURE_MAX_FRAMES")]
    pub max_frames: u64,

    /// Session timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "RGBD_CAPTURE_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without opening a device
    #[arg(long)]
    pub dry_run: bool,

    /// Accept frames whose resolution differs from the configuration
    #[arg(long)]
    pub relaxed: bool,

    /// Disable the periodic tuning controller
    #[arg(long)]
    pub no_tuning: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
