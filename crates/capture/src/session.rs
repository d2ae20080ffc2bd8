//! Capture session orchestration.
//!
//! Owns the full device lifecycle: open, startup configuration, stream
//! start, the blocking ingest loop with interleaved tuning sweeps, and
//! stream shutdown. The loop runs on one thread; cancellation is
//! observed at iteration boundaries.

use std::time::{Duration, Instant};

use contracts::{CameraHost, CancelToken, CaptureConfig};
use observability::RunningStats;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::fps::{FpsWindow, DEFAULT_WINDOW_CAPACITY};
use crate::ingest::{ingest, FrameBuffers, IngestOutcome};
use crate::retry::RetryPolicy;
use crate::startup::{apply_visual_preset, configure_illumination};
use crate::stats::{CaptureStats, StopReason};
use crate::tuning::TuningController;

/// One end-to-end capture run against a camera host
pub struct CaptureSession<H: CameraHost> {
    host: H,
    config: CaptureConfig,
    cancel: CancelToken,
    max_frames: Option<u64>,
}

impl<H: CameraHost> CaptureSession<H> {
    pub fn new(host: H, config: CaptureConfig, cancel: CancelToken) -> Self {
        Self {
            host,
            config,
            cancel,
            max_frames: None,
        }
    }

    /// Stop after this many captured frame pairs
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Open the device, configure it, and run the capture loop until
    /// cancellation, end of stream, or the frame limit.
    ///
    /// Startup configuration failures are fatal. Once streaming, only
    /// frame delivery and validation failures end the session with an
    /// error; tuning mutations degrade to warnings.
    pub fn run(mut self) -> Result<CaptureStats> {
        let descriptor = self.host.open()?;
        info!(
            device = %descriptor.name,
            serial = %descriptor.serial,
            sensors = descriptor.sensor_count,
            "device opened"
        );

        let mut sensors = self.host.sensors()?;
        let policy = RetryPolicy::from(&self.config.retry);

        apply_visual_preset(&mut sensors, &self.config.preset)?;

        let mut source = self.host.start_streaming(&self.config.stream)?;
        info!(
            depth_width = self.config.stream.depth_width,
            depth_height = self.config.stream.depth_height,
            color_width = self.config.stream.color_width,
            color_height = self.config.stream.color_height,
            framerate = self.config.stream.framerate,
            "streaming started"
        );

        if let Err(e) = configure_illumination(&mut sensors, policy) {
            error!(error = %e, "startup illumination configuration failed");
            source.stop();
            return Err(e);
        }

        let wait_timeout = Duration::from_millis(self.config.stream.wait_timeout_ms);
        let mut buffers = FrameBuffers::for_stream(&self.config.stream);
        let mut fps = FpsWindow::new(DEFAULT_WINDOW_CAPACITY);
        let mut frame_time_stats = RunningStats::default();
        let mut tuning = self
            .config
            .tuning
            .enabled
            .then(|| TuningController::new(&self.config.tuning, Instant::now()));

        let session_start = Instant::now();
        let mut frames_captured = 0u64;
        let mut tuning_sweeps = 0u64;

        let stop_reason = loop {
            let iteration_start = Instant::now();

            if self.cancel.is_cancelled() {
                info!("cancellation requested, stopping capture");
                break StopReason::Cancelled;
            }

            if let Some(controller) = tuning.as_mut() {
                if controller.poll(iteration_start) {
                    let report = controller.sweep(&mut sensors, &self.config.stream, policy);
                    observability::record_tuning_sweep(report.applied, report.skipped);
                    tuning_sweeps += 1;
                }
            }

            let frames = match source.wait_for_frames(wait_timeout) {
                Ok(frames) => frames,
                Err(e) => {
                    error!(error = %e, "frame wait failed");
                    source.stop();
                    return Err(e.into());
                }
            };

            match ingest(&frames, &self.config.stream, &mut buffers) {
                Ok(IngestOutcome::Pair) => {}
                Ok(IngestOutcome::MissingModality { depth, color }) => {
                    warn!(
                        depth_missing = depth,
                        color_missing = color,
                        "modality stopped arriving, treating as end of stream"
                    );
                    break StopReason::EndOfStream;
                }
                Err(e) => {
                    error!(error = %e, "frame validation failed");
                    source.stop();
                    return Err(e);
                }
            }

            frames_captured += 1;

            let duration_ms = (iteration_start.elapsed().as_millis() as u64).max(1);
            fps.record(duration_ms);
            frame_time_stats.push(duration_ms as f64);
            observability::record_frame_captured(duration_ms, fps.fps());

            info!(
                frame = frames_captured,
                duration_ms,
                fps = fps.fps(),
                "finished frame"
            );

            if self.max_frames.is_some_and(|limit| frames_captured >= limit) {
                info!(frames = frames_captured, "frame limit reached");
                break StopReason::FrameLimit;
            }
        };

        source.stop();

        Ok(CaptureStats {
            frames_captured,
            tuning_sweeps,
            duration: session_start.elapsed(),
            average_frame_ms: fps.average_ms(),
            estimated_fps: fps.fps(),
            frame_time_stats,
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_host::{FramePlan, SimulatedHost, SimulatedHostConfig};
    use contracts::StreamConfig;

    fn test_config() -> CaptureConfig {
        let mut config = CaptureConfig::default();
        config.stream = StreamConfig {
            depth_width: 64,
            depth_height: 48,
            color_width: 96,
            color_height: 54,
            ..StreamConfig::default()
        };
        config.tuning.settle_ms = 0;
        config.retry.delay_ms = 0;
        config
    }

    #[test]
    fn test_runs_until_frame_limit() {
        let host = SimulatedHost::new(SimulatedHostConfig::default());
        let stereo = host.sensor("stereo").unwrap();
        let cancel = CancelToken::new();

        let stats = CaptureSession::new(host, test_config(), cancel)
            .with_max_frames(Some(5))
            .run()
            .unwrap();

        assert_eq!(stats.frames_captured, 5);
        assert_eq!(stats.stop_reason, StopReason::FrameLimit);
        // startup configuration ran: preset + emitter + laser max
        let writes = stereo.writes();
        assert!(writes.contains(&(contracts::TuningOption::VisualPreset, 1.0)));
        assert!(writes.contains(&(contracts::TuningOption::EmitterEnabled, 1.0)));
        assert_eq!(
            stereo.current(contracts::TuningOption::LaserPower),
            Some(360.0)
        );
    }

    #[test]
    fn test_missing_color_ends_stream() {
        let host = SimulatedHost::new(SimulatedHostConfig {
            plan: FramePlan {
                complete_frames: Some(3),
                ..Default::default()
            },
            ..Default::default()
        });
        let cancel = CancelToken::new();

        let stats = CaptureSession::new(host, test_config(), cancel)
            .run()
            .unwrap();

        assert_eq!(stats.frames_captured, 3);
        assert_eq!(stats.stop_reason, StopReason::EndOfStream);
    }

    #[test]
    fn test_pre_cancelled_token_captures_nothing() {
        let host = SimulatedHost::new(SimulatedHostConfig::default());
        let cancel = CancelToken::new();
        cancel.cancel();

        let stats = CaptureSession::new(host, test_config(), cancel)
            .run()
            .unwrap();

        assert_eq!(stats.frames_captured, 0);
        assert_eq!(stats.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn test_frame_wait_failure_is_fatal() {
        let host = SimulatedHost::new(SimulatedHostConfig {
            plan: FramePlan {
                fail_wait_at: Some(2),
                ..Default::default()
            },
            ..Default::default()
        });
        let probe = host.probe();
        let cancel = CancelToken::new();

        let err = CaptureSession::new(host, test_config(), cancel)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::CaptureError::Device(contracts::DeviceError::FrameTimeout { .. })
        ));
        assert!(probe.stream_stopped());
    }

    #[test]
    fn test_bad_depth_resolution_is_fatal() {
        let host = SimulatedHost::new(SimulatedHostConfig {
            plan: FramePlan {
                bad_depth_at: Some(2),
                ..Default::default()
            },
            ..Default::default()
        });
        let cancel = CancelToken::new();

        let err = CaptureSession::new(host, test_config(), cancel)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::CaptureError::ResolutionMismatch { stream: "depth", .. }
        ));
    }
}
