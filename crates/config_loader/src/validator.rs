//! Configuration validation.
//!
//! Rules:
//! - stream geometry and framerate are non-zero (derive-level)
//! - wait_timeout_ms > 0
//! - interval_step_ms > 0 while tuning is enabled (the interval must
//!   strictly grow after each sweep)
//! - preset name is non-empty
//! - settle_ms stays below the initial sweep interval

use contracts::{CaptureConfig, DeviceError};
use validator::Validate;

/// Validate a parsed CaptureConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &CaptureConfig) -> Result<(), DeviceError> {
    validate_derived(config)?;
    validate_stream(config)?;
    validate_tuning(config)?;
    validate_preset(config)?;
    Ok(())
}

/// Run the derive-level range checks from `contracts`
fn validate_derived(config: &CaptureConfig) -> Result<(), DeviceError> {
    config.validate().map_err(|e| {
        let field = e
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "config".to_string());
        DeviceError::config_validation(field, e.to_string())
    })
}

fn validate_stream(config: &CaptureConfig) -> Result<(), DeviceError> {
    if config.stream.wait_timeout_ms == 0 {
        return Err(DeviceError::config_validation(
            "stream.wait_timeout_ms",
            "frame wait timeout must be > 0",
        ));
    }
    Ok(())
}

fn validate_tuning(config: &CaptureConfig) -> Result<(), DeviceError> {
    let tuning = &config.tuning;

    if !tuning.enabled {
        return Ok(());
    }

    if tuning.interval_step_ms == 0 {
        return Err(DeviceError::config_validation(
            "tuning.interval_step_ms",
            "interval step must be > 0 while tuning is enabled",
        ));
    }

    if tuning.initial_interval_ms == 0 {
        return Err(DeviceError::config_validation(
            "tuning.initial_interval_ms",
            "initial interval must be > 0 while tuning is enabled",
        ));
    }

    if tuning.settle_ms >= tuning.initial_interval_ms {
        return Err(DeviceError::config_validation(
            "tuning.settle_ms",
            format!(
                "settle delay ({}) must be shorter than the initial interval ({})",
                tuning.settle_ms, tuning.initial_interval_ms
            ),
        ));
    }

    Ok(())
}

fn validate_preset(config: &CaptureConfig) -> Result<(), DeviceError> {
    if config.preset.name.trim().is_empty() {
        return Err(DeviceError::config_validation(
            "preset.name",
            "preset name cannot be empty",
        ));
    }
    Ok(())
}
