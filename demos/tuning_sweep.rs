//! Tuning Sweep Example
//!
//! Exercises the periodic tuning controller in isolation, including a
//! device that keeps reporting busy and one that silently drops the
//! auto-exposure re-enable write.
//!
//! Run with: cargo run --bin tuning_sweep

use std::time::Instant;

use camera_host::SimulatedSensor;
use capture::{RetryPolicy, TuningController};
use contracts::{SensorControl, StreamConfig, TuningConfig, TuningOption};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("Starting Tuning Sweep Demo");

    let stream = StreamConfig::default();
    let tuning = TuningConfig {
        enabled: true,
        initial_interval_ms: 0,
        interval_step_ms: 1000,
        settle_ms: 10,
    };
    let policy = RetryPolicy {
        max_retries: 3,
        delay: std::time::Duration::from_millis(20),
    };

    // A healthy stereo module, a busy one, and one that drops the
    // auto-exposure re-enable write
    let healthy = SimulatedSensor::stereo("stereo-healthy");
    let busy = SimulatedSensor::stereo("stereo-busy").fail_set_option(TuningOption::EmitterEnabled, 10);
    let flaky = SimulatedSensor::stereo("stereo-flaky").ignore_auto_exposure_enable();

    let mut sensors: Vec<Box<dyn SensorControl>> = vec![
        Box::new(healthy.clone()),
        Box::new(busy.clone()),
        Box::new(flaky.clone()),
    ];

    let controller = TuningController::new(&tuning, Instant::now());
    let report = controller.sweep(&mut sensors, &stream, policy);

    tracing::info!(
        applied = report.applied,
        skipped = report.skipped,
        "Sweep finished"
    );

    for sensor in [&healthy, &busy, &flaky] {
        tracing::info!(
            sensor = sensor.name(),
            writes = ?sensor.writes(),
            roi_writes = sensor.roi_writes().len(),
            "Mutation log"
        );
    }
}
