//! One-time startup configuration.
//!
//! Unlike the periodic sweep, startup configuration is fatal on failure:
//! a retry budget exhausted here stops the whole session before or right
//! after streaming begins.

use contracts::{PresetConfig, SensorControl, TuningOption};
use tracing::{debug, info};

use crate::error::{CaptureError, Result};
use crate::retry::{with_retry, RetryPolicy};

/// Select the configured visual preset.
///
/// Finds the first sensor advertising the preset option, checks whether
/// the desired preset is already active, and otherwise scans the option
/// range for the value whose description matches the configured name.
///
/// # Errors
/// - `PresetUnsupported` when no sensor advertises the option
/// - `PresetNotFound` when the name matches no value description
pub fn apply_visual_preset(
    sensors: &mut [Box<dyn SensorControl>],
    preset: &PresetConfig,
) -> Result<()> {
    let name = preset.name.as_str();

    let Some(sensor) = sensors
        .iter_mut()
        .find(|s| s.supports(TuningOption::VisualPreset))
    else {
        return Err(CaptureError::PresetUnsupported);
    };

    let current = sensor.option(TuningOption::VisualPreset)?;
    if let Some(description) = sensor.describe_option_value(TuningOption::VisualPreset, current) {
        if description.starts_with(name) {
            info!(preset = name, "already using desired preset");
            return Ok(());
        }
    }

    let range = sensor.option_range(TuningOption::VisualPreset)?;
    for value in (range.min as i32)..(range.max as i32) {
        let matched = sensor
            .describe_option_value(TuningOption::VisualPreset, value as f32)
            .is_some_and(|description| description.starts_with(name));
        if matched {
            sensor.set_option(TuningOption::VisualPreset, value as f32)?;
            info!(preset = name, value, "enabled visual preset");
            return Ok(());
        }
    }

    Err(CaptureError::PresetNotFound {
        name: name.to_string(),
    })
}

/// Enable the emitter and drive laser power to its maximum on every
/// supporting sensor, each call under the fatal retry policy. The laser
/// write is verified by readback.
pub fn configure_illumination(
    sensors: &mut [Box<dyn SensorControl>],
    policy: RetryPolicy,
) -> Result<()> {
    for sensor in sensors.iter_mut() {
        if sensor.supports(TuningOption::EmitterEnabled) {
            with_retry(policy, "set_option", || {
                sensor.set_option(TuningOption::EmitterEnabled, 1.0)
            })?;
            info!(sensor = sensor.name(), "emitter enabled");
        } else {
            debug!(sensor = sensor.name(), "no emitter option");
        }

        if sensor.supports(TuningOption::LaserPower) {
            let range = sensor.option_range(TuningOption::LaserPower)?;
            with_retry(policy, "set_option", || {
                sensor.set_option(TuningOption::LaserPower, range.max)
            })?;

            let readback = sensor.option(TuningOption::LaserPower)?;
            if readback != range.max {
                return Err(CaptureError::LaserPowerReadback {
                    got: readback,
                    expected: range.max,
                });
            }
            info!(sensor = sensor.name(), power = range.max, "laser power set to max");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_host::SimulatedSensor;
    use contracts::PresetConfig;
    use std::time::Duration;

    fn instant_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_preset_selected_by_description() {
        let sensor = SimulatedSensor::stereo("stereo");
        let mut sensors: Vec<Box<dyn SensorControl>> =
            vec![Box::new(SimulatedSensor::rgb("rgb")), Box::new(sensor.clone())];

        apply_visual_preset(
            &mut sensors,
            &PresetConfig {
                name: "High Accuracy".to_string(),
            },
        )
        .unwrap();

        assert_eq!(sensor.current(TuningOption::VisualPreset), Some(1.0));
    }

    #[test]
    fn test_preset_already_active_is_a_noop() {
        let sensor = SimulatedSensor::stereo("stereo");
        {
            let mut boxed: Box<dyn SensorControl> = Box::new(sensor.clone());
            boxed
                .set_option(TuningOption::VisualPreset, 2.0)
                .unwrap();
        }
        let mut sensors: Vec<Box<dyn SensorControl>> = vec![Box::new(sensor.clone())];

        apply_visual_preset(
            &mut sensors,
            &PresetConfig {
                name: "High Density".to_string(),
            },
        )
        .unwrap();

        // only the scripted write above, none from preset selection
        assert_eq!(sensor.writes().len(), 1);
    }

    #[test]
    fn test_unknown_preset_name_fails() {
        let mut sensors: Vec<Box<dyn SensorControl>> =
            vec![Box::new(SimulatedSensor::stereo("stereo"))];
        let err = apply_visual_preset(
            &mut sensors,
            &PresetConfig {
                name: "Underwater".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CaptureError::PresetNotFound { .. }));
    }

    #[test]
    fn test_no_preset_capable_sensor_fails() {
        let mut sensors: Vec<Box<dyn SensorControl>> =
            vec![Box::new(SimulatedSensor::rgb("rgb"))];
        let err = apply_visual_preset(
            &mut sensors,
            &PresetConfig {
                name: "High Accuracy".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CaptureError::PresetUnsupported));
    }

    #[test]
    fn test_illumination_retries_then_succeeds() {
        let sensor =
            SimulatedSensor::stereo("stereo").fail_set_option(TuningOption::EmitterEnabled, 2);
        let mut sensors: Vec<Box<dyn SensorControl>> = vec![Box::new(sensor.clone())];

        configure_illumination(&mut sensors, instant_policy(5)).unwrap();
        assert_eq!(sensor.current(TuningOption::EmitterEnabled), Some(1.0));
        assert_eq!(sensor.current(TuningOption::LaserPower), Some(360.0));
    }

    #[test]
    fn test_illumination_exhaustion_is_fatal() {
        let sensor =
            SimulatedSensor::stereo("stereo").fail_set_option(TuningOption::EmitterEnabled, 6);
        let mut sensors: Vec<Box<dyn SensorControl>> = vec![Box::new(sensor.clone())];

        let err = configure_illumination(&mut sensors, instant_policy(5)).unwrap_err();
        assert!(matches!(err, CaptureError::RetryExhausted { .. }));
        // 1 initial attempt + 5 retries consumed 6 injected failures
        assert_eq!(sensor.current(TuningOption::EmitterEnabled), Some(0.0));
    }
}
