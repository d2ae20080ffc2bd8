//! Periodic tuning controller.
//!
//! Two states per sweep: idle (waiting for the interval to elapse) and
//! mutating (applying the preset sequence). The interval grows by a fixed
//! step after each firing, spacing out successive intrusive
//! reconfigurations. Sweep mutations are best effort: a failing step is
//! logged and skipped, never fatal.

use std::time::{Duration, Instant};

use contracts::{RegionOfInterest, SensorControl, StreamConfig, TuningConfig, TuningOption};
use tracing::{debug, info, warn};

use crate::retry::{with_retry, RetryPolicy};

/// Outcome of one sweep across all sensors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Mutations successfully applied
    pub applied: u32,
    /// Steps skipped (missing capability, failed mutation, or unsafe
    /// region-of-interest precondition)
    pub skipped: u32,
}

/// Interval state machine + per-sensor mutation sequence
pub struct TuningController {
    last_toggle: Instant,
    interval: Duration,
    step: Duration,
    settle: Duration,
}

impl TuningController {
    pub fn new(config: &TuningConfig, now: Instant) -> Self {
        Self {
            last_toggle: now,
            interval: Duration::from_millis(config.initial_interval_ms),
            step: Duration::from_millis(config.interval_step_ms),
            settle: Duration::from_millis(config.settle_ms),
        }
    }

    /// Current interval length (grows after each firing)
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check whether the interval has elapsed. On firing, the toggle time
    /// resets to `now` and the interval grows by the configured step.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_toggle) <= self.interval {
            return false;
        }
        self.last_toggle = now;
        self.interval += self.step;
        true
    }

    /// Apply the mutation sequence to every sensor.
    ///
    /// Capability checks are per mutation: a sensor missing one option
    /// still receives the others. Region-of-interest configuration runs
    /// only when the auto-exposure re-enable readback confirms enabled.
    pub fn sweep(
        &self,
        sensors: &mut [Box<dyn SensorControl>],
        stream: &StreamConfig,
        policy: RetryPolicy,
    ) -> SweepReport {
        let mut report = SweepReport::default();
        info!(sensors = sensors.len(), "starting tuning sweep");

        for sensor in sensors.iter_mut() {
            self.sweep_sensor(sensor.as_mut(), stream, policy, &mut report);
        }

        info!(
            applied = report.applied,
            skipped = report.skipped,
            next_interval_ms = self.interval.as_millis() as u64,
            "tuning sweep finished"
        );
        report
    }

    fn sweep_sensor(
        &self,
        sensor: &mut dyn SensorControl,
        stream: &StreamConfig,
        policy: RetryPolicy,
        report: &mut SweepReport,
    ) {
        if sensor.supports(TuningOption::AutoExposure) {
            self.toggle_auto_exposure(sensor, stream, policy, report);
        } else {
            debug!(sensor = sensor.name(), "no auto exposure control, skipping");
            report.skipped += 1;
        }

        if sensor.supports(TuningOption::EmitterEnabled) {
            if self.try_set_option(sensor, TuningOption::EmitterEnabled, 1.0, policy) {
                report.applied += 1;
                self.settle();
            } else {
                report.skipped += 1;
            }
        }
    }

    /// Disable, re-enable, read back; region of interest only if the
    /// readback confirms auto exposure is on again.
    fn toggle_auto_exposure(
        &self,
        sensor: &mut dyn SensorControl,
        stream: &StreamConfig,
        policy: RetryPolicy,
        report: &mut SweepReport,
    ) {
        match sensor.option(TuningOption::AutoExposure) {
            Ok(value) if value > 0.0 => {
                if self.try_set_option(sensor, TuningOption::AutoExposure, 0.0, policy) {
                    report.applied += 1;
                    self.settle();
                } else {
                    report.skipped += 1;
                }
            }
            Ok(_) => {
                debug!(
                    sensor = sensor.name(),
                    "auto exposure already disabled, skipping disable step"
                );
                report.skipped += 1;
            }
            Err(e) => {
                warn!(sensor = sensor.name(), error = %e, "auto exposure read failed, skipping");
                report.skipped += 1;
                return;
            }
        }

        if self.try_set_option(sensor, TuningOption::AutoExposure, 1.0, policy) {
            report.applied += 1;
            self.settle();
        } else {
            report.skipped += 1;
            return;
        }

        // Region-of-interest writes while auto exposure is confirmed off
        // are unsafe; gate on the readback, not the write.
        match sensor.option(TuningOption::AutoExposure) {
            Ok(value) if value > 0.0 => {
                if sensor.supports_roi() {
                    let roi = RegionOfInterest::centered(stream.depth_width, stream.depth_height);
                    if self.try_set_roi(sensor, roi, policy) {
                        report.applied += 1;
                        self.settle();
                    } else {
                        report.skipped += 1;
                    }
                } else {
                    debug!(sensor = sensor.name(), "no region-of-interest control, skipping");
                    report.skipped += 1;
                }
            }
            Ok(_) => {
                warn!(
                    sensor = sensor.name(),
                    "auto exposure still reports disabled, skipping region of interest"
                );
                report.skipped += 1;
            }
            Err(e) => {
                warn!(sensor = sensor.name(), error = %e, "auto exposure readback failed, skipping region of interest");
                report.skipped += 1;
            }
        }
    }

    /// Best-effort option write: bounded retries, then log and skip
    fn try_set_option(
        &self,
        sensor: &mut dyn SensorControl,
        option: TuningOption,
        value: f32,
        policy: RetryPolicy,
    ) -> bool {
        let result = with_retry(policy, "set_option", || sensor.set_option(option, value));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    sensor = sensor.name(),
                    option = option.name(),
                    value,
                    error = %e,
                    "tuning mutation failed, skipping"
                );
                false
            }
        }
    }

    fn try_set_roi(
        &self,
        sensor: &mut dyn SensorControl,
        roi: RegionOfInterest,
        policy: RetryPolicy,
    ) -> bool {
        match with_retry(policy, "set_roi", || sensor.set_roi(roi)) {
            Ok(()) => {
                debug!(sensor = sensor.name(), ?roi, "region of interest applied");
                true
            }
            Err(e) => {
                warn!(sensor = sensor.name(), error = %e, "region-of-interest write failed, skipping");
                false
            }
        }
    }

    fn settle(&self) {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_host::SimulatedSensor;
    use contracts::TuningConfig;

    fn config() -> TuningConfig {
        TuningConfig {
            enabled: true,
            initial_interval_ms: 1000,
            interval_step_ms: 500,
            settle_ms: 0,
        }
    }

    fn instant_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 5,
            delay: Duration::ZERO,
        }
    }

    fn stream() -> StreamConfig {
        StreamConfig {
            depth_width: 1280,
            depth_height: 720,
            ..StreamConfig::default()
        }
    }

    #[test]
    fn test_interval_grows_after_each_firing() {
        let t0 = Instant::now();
        let mut controller = TuningController::new(&config(), t0);
        assert_eq!(controller.interval(), Duration::from_millis(1000));

        // not yet elapsed
        assert!(!controller.poll(t0 + Duration::from_millis(1000)));

        // fires and grows
        assert!(controller.poll(t0 + Duration::from_millis(1001)));
        assert_eq!(controller.interval(), Duration::from_millis(1500));

        // never fires twice within less than the current interval
        let t1 = t0 + Duration::from_millis(1001);
        assert!(!controller.poll(t1 + Duration::from_millis(1500)));
        assert!(controller.poll(t1 + Duration::from_millis(1501)));
        assert_eq!(controller.interval(), Duration::from_millis(2000));
    }

    #[test]
    fn test_sweep_applies_roi_when_readback_enabled() {
        let sensor = SimulatedSensor::stereo("stereo");
        let mut sensors: Vec<Box<dyn SensorControl>> = vec![Box::new(sensor.clone())];
        let controller = TuningController::new(&config(), Instant::now());

        controller.sweep(&mut sensors, &stream(), instant_policy());

        let writes = sensor.writes();
        // disable then re-enable auto exposure, then emitter
        assert_eq!(writes[0], (TuningOption::AutoExposure, 0.0));
        assert_eq!(writes[1], (TuningOption::AutoExposure, 1.0));
        assert!(writes.contains(&(TuningOption::EmitterEnabled, 1.0)));

        let rois = sensor.roi_writes();
        assert_eq!(rois.len(), 1);
        assert_eq!(rois[0], RegionOfInterest::centered(1280, 720));
    }

    #[test]
    fn test_sweep_skips_roi_when_readback_disabled() {
        let sensor = SimulatedSensor::stereo("stereo").ignore_auto_exposure_enable();
        let mut sensors: Vec<Box<dyn SensorControl>> = vec![Box::new(sensor.clone())];
        let controller = TuningController::new(&config(), Instant::now());

        controller.sweep(&mut sensors, &stream(), instant_policy());

        assert!(sensor.roi_writes().is_empty());
    }

    #[test]
    fn test_sweep_survives_exhausted_retries() {
        // Emitter write never succeeds; the sweep skips it instead of
        // failing the session.
        let sensor =
            SimulatedSensor::stereo("stereo").fail_set_option(TuningOption::EmitterEnabled, 100);
        let mut sensors: Vec<Box<dyn SensorControl>> = vec![Box::new(sensor.clone())];
        let controller = TuningController::new(&config(), Instant::now());

        let report = controller.sweep(&mut sensors, &stream(), instant_policy());
        assert!(report.skipped >= 1);
        assert_eq!(sensor.current(TuningOption::EmitterEnabled), Some(0.0));
    }

    #[test]
    fn test_sweep_without_capabilities_is_a_noop() {
        let sensor = SimulatedSensor::rgb("rgb")
            .without(TuningOption::AutoExposure)
            .without_roi();
        let mut sensors: Vec<Box<dyn SensorControl>> = vec![Box::new(sensor.clone())];
        let controller = TuningController::new(&config(), Instant::now());

        let report = controller.sweep(&mut sensors, &stream(), instant_policy());
        assert_eq!(report.applied, 0);
        assert!(sensor.writes().is_empty());
    }
}
