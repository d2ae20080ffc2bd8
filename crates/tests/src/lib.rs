//! # Integration Tests
//!
//! End-to-end tests against the simulated camera host.
//!
//! Covers:
//! - Contract smoke tests
//! - Full capture sessions (no hardware required)
//! - Failure-injection scenarios: busy devices, resolution mismatches,
//!   stream loss, cancellation

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_centered_roi_matches_depth_geometry() {
        let roi = contracts::RegionOfInterest::centered(1280, 720);
        assert_eq!((roi.min_x, roi.min_y), (512, 288));
        assert_eq!((roi.max_x, roi.max_y), (768, 432));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use camera_host::{FramePlan, SimulatedHost, SimulatedHostConfig, SimulatedSensor};
    use capture::{CaptureError, CaptureSession, StopReason};
    use contracts::{
        CancelToken, CaptureConfig, StreamConfig, TuningOption, ValidationMode,
    };

    /// Small geometry and zero delays keep the suite fast
    fn test_config() -> CaptureConfig {
        let mut config = CaptureConfig::default();
        config.stream = StreamConfig {
            depth_width: 64,
            depth_height: 48,
            color_width: 96,
            color_height: 54,
            wait_timeout_ms: 100,
            ..StreamConfig::default()
        };
        config.tuning.settle_ms = 0;
        config.retry.delay_ms = 0;
        config
    }

    fn host_with_plan(plan: FramePlan) -> SimulatedHost {
        SimulatedHost::new(SimulatedHostConfig {
            plan,
            ..Default::default()
        })
    }

    /// End-to-end: startup configuration, capture until the color
    /// modality drops out, clean shutdown
    #[test]
    fn test_e2e_capture_until_end_of_stream() {
        let host = host_with_plan(FramePlan {
            complete_frames: Some(20),
            ..Default::default()
        });
        let stereo = host.sensor("stereo").unwrap();
        let probe = host.probe();

        let stats = CaptureSession::new(host, test_config(), CancelToken::new())
            .run()
            .unwrap();

        assert_eq!(stats.frames_captured, 20);
        assert_eq!(stats.stop_reason, StopReason::EndOfStream);
        assert!(probe.stream_started());
        assert!(probe.stream_stopped());

        // Startup configuration reached the device
        let writes = stereo.writes();
        assert!(writes.contains(&(TuningOption::VisualPreset, 1.0)));
        assert!(writes.contains(&(TuningOption::EmitterEnabled, 1.0)));
        assert_eq!(stereo.current(TuningOption::LaserPower), Some(360.0));
    }

    /// Strict validation: one off-geometry depth frame ends the session
    /// with an error and the stream is stopped
    #[test]
    fn test_e2e_strict_resolution_mismatch_aborts() {
        let host = host_with_plan(FramePlan {
            bad_depth_at: Some(3),
            ..Default::default()
        });
        let probe = host.probe();

        let err = CaptureSession::new(host, test_config(), CancelToken::new())
            .run()
            .unwrap_err();

        assert!(matches!(
            err,
            CaptureError::ResolutionMismatch { stream: "depth", .. }
        ));
        assert!(probe.stream_stopped());
    }

    /// Relaxed validation: the same off-geometry frame is accepted
    #[test]
    fn test_e2e_relaxed_mode_tolerates_mismatch() {
        let host = host_with_plan(FramePlan {
            bad_depth_at: Some(3),
            ..Default::default()
        });

        let mut config = test_config();
        config.stream.validation = ValidationMode::Relaxed;

        let stats = CaptureSession::new(host, config, CancelToken::new())
            .with_max_frames(Some(10))
            .run()
            .unwrap();

        assert_eq!(stats.frames_captured, 10);
        assert_eq!(stats.stop_reason, StopReason::FrameLimit);
    }

    /// Startup illumination survives a busy device within the retry
    /// budget
    #[test]
    fn test_e2e_busy_device_recovers_within_budget() {
        let sensors = vec![
            SimulatedSensor::stereo("stereo").fail_set_option(TuningOption::EmitterEnabled, 2),
            SimulatedSensor::rgb("rgb"),
        ];
        let host = SimulatedHost::with_sensors(SimulatedHostConfig::default(), sensors);
        let stereo = host.sensor("stereo").unwrap();

        let stats = CaptureSession::new(host, test_config(), CancelToken::new())
            .with_max_frames(Some(3))
            .run()
            .unwrap();

        assert_eq!(stats.frames_captured, 3);
        assert_eq!(stereo.current(TuningOption::EmitterEnabled), Some(1.0));
    }

    /// Startup illumination aborts once the retry budget is exhausted,
    /// stopping the already-started stream
    #[test]
    fn test_e2e_busy_device_exhausts_budget() {
        let sensors = vec![
            SimulatedSensor::stereo("stereo").fail_set_option(TuningOption::EmitterEnabled, 6),
            SimulatedSensor::rgb("rgb"),
        ];
        let host = SimulatedHost::with_sensors(SimulatedHostConfig::default(), sensors);
        let probe = host.probe();

        let err = CaptureSession::new(host, test_config(), CancelToken::new())
            .run()
            .unwrap_err();

        assert!(matches!(err, CaptureError::RetryExhausted { retries: 5, .. }));
        assert!(probe.stream_stopped());
    }

    /// Tuning sweeps fire during capture and toggle auto exposure
    #[test]
    fn test_e2e_tuning_sweeps_fire() {
        let host = host_with_plan(FramePlan {
            frame_interval: Duration::from_millis(2),
            ..Default::default()
        });
        let stereo = host.sensor("stereo").unwrap();

        let mut config = test_config();
        config.tuning.initial_interval_ms = 1;
        config.tuning.interval_step_ms = 1;

        let stats = CaptureSession::new(host, config, CancelToken::new())
            .with_max_frames(Some(20))
            .run()
            .unwrap();

        assert!(stats.tuning_sweeps >= 1);
        let writes = stereo.writes();
        assert!(writes.contains(&(TuningOption::AutoExposure, 0.0)));
        assert!(writes.contains(&(TuningOption::AutoExposure, 1.0)));
        assert_eq!(stereo.roi_writes().len() as u64, stats.tuning_sweeps);
    }

    /// Cancellation from the async harness, mirroring the CLI's signal
    /// handling: a token flipped from a task stops the blocking loop
    #[tokio::test]
    async fn test_e2e_cancellation_from_async_harness() {
        let host = host_with_plan(FramePlan {
            frame_interval: Duration::from_millis(2),
            ..Default::default()
        });

        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let session = CaptureSession::new(host, test_config(), cancel);
        let stats = tokio::task::spawn_blocking(move || session.run())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stats.stop_reason, StopReason::Cancelled);
        assert!(stats.frames_captured > 0);
    }

    /// Configuration loaded from TOML drives a full session
    #[test]
    fn test_e2e_config_from_toml() {
        let toml = r#"
            [stream]
            depth_width = 64
            depth_height = 48
            color_width = 96
            color_height = 54
            wait_timeout_ms = 100

            [tuning]
            enabled = false

            [retry]
            delay_ms = 0
        "#;
        let config =
            config_loader::ConfigLoader::load_from_str(toml, config_loader::ConfigFormat::Toml)
                .unwrap();
        assert!(!config.tuning.enabled);

        let host = host_with_plan(FramePlan::default());
        let stats = CaptureSession::new(host, config, CancelToken::new())
            .with_max_frames(Some(5))
            .run()
            .unwrap();

        assert_eq!(stats.frames_captured, 5);
        assert_eq!(stats.tuning_sweeps, 0);
    }
}
