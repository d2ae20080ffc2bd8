//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{CaptureConfig, ValidationMode};

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    depth_resolution: String,
    color_resolution: String,
    framerate: u32,
    preset: String,
    tuning_enabled: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    depth_resolution: format!(
                        "{}x{}",
                        config.stream.depth_width, config.stream.depth_height
                    ),
                    color_resolution: format!(
                        "{}x{}",
                        config.stream.color_width, config.stream.color_height
                    ),
                    framerate: config.stream.framerate,
                    preset: config.preset.name.clone(),
                    tuning_enabled: config.tuning.enabled,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &CaptureConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if matches!(config.stream.validation, ValidationMode::Relaxed) {
        warnings.push(
            "Relaxed validation accepts frames whose resolution differs from the configuration"
                .to_string(),
        );
    }

    if !config.tuning.enabled {
        warnings.push("Tuning disabled - exposure and metering are never re-tuned".to_string());
    }

    // Three frame periods is the practical floor before timeouts fire
    // during normal operation
    let frame_period_ms = 1000 / config.stream.framerate.max(1) as u64;
    if config.stream.wait_timeout_ms < frame_period_ms * 3 {
        warnings.push(format!(
            "Frame wait timeout ({} ms) is below 3 frame periods ({} ms)",
            config.stream.wait_timeout_ms,
            frame_period_ms * 3
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Depth: {}", summary.depth_resolution);
            println!("  Color: {}", summary.color_resolution);
            println!("  Framerate: {}", summary.framerate);
            println!("  Preset: {}", summary.preset);
            println!("  Tuning: {}", summary.tuning_enabled);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
