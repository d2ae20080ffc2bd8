//! Capture session statistics.

use std::time::Duration;

use observability::{RunningStats, StatsSummary};

/// Why the capture loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Cancellation requested (signal or harness timeout)
    Cancelled,
    /// A modality stopped arriving
    EndOfStream,
    /// Configured frame limit reached
    FrameLimit,
}

/// Statistics from one capture session run
#[derive(Debug, Clone)]
pub struct CaptureStats {
    /// Complete frame pairs captured
    pub frames_captured: u64,

    /// Tuning sweeps that fired
    pub tuning_sweeps: u64,

    /// Total duration of the session
    pub duration: Duration,

    /// Windowed average frame duration at shutdown (ms)
    pub average_frame_ms: u64,

    /// Windowed FPS estimate at shutdown
    pub estimated_fps: u64,

    /// Frame duration statistics over the whole run (ms)
    pub frame_time_stats: RunningStats,

    /// Why the loop ended
    pub stop_reason: StopReason,
}

impl CaptureStats {
    /// Whole-run throughput, frames per second
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_captured as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Capture Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Frames captured: {}", self.frames_captured);
        println!("   ├─ Tuning sweeps: {}", self.tuning_sweeps);
        println!("   ├─ Throughput: {:.2} fps", self.fps());
        println!("   └─ Stop reason: {:?}", self.stop_reason);

        println!("\n📈 Frame Timing");
        println!("   ├─ Windowed average: {} ms", self.average_frame_ms);
        println!("   ├─ Windowed FPS estimate: {}", self.estimated_fps);
        println!(
            "   └─ Frame time (ms): {}",
            StatsSummary::from(&self.frame_time_stats)
        );

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_over_whole_run() {
        let stats = CaptureStats {
            frames_captured: 300,
            tuning_sweeps: 2,
            duration: Duration::from_secs(10),
            average_frame_ms: 33,
            estimated_fps: 30,
            frame_time_stats: RunningStats::default(),
            stop_reason: StopReason::FrameLimit,
        };
        assert!((stats.fps() - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_duration_fps() {
        let stats = CaptureStats {
            frames_captured: 0,
            tuning_sweeps: 0,
            duration: Duration::ZERO,
            average_frame_ms: 1,
            estimated_fps: 1000,
            frame_time_stats: RunningStats::default(),
            stop_reason: StopReason::Cancelled,
        };
        assert_eq!(stats.fps(), 0.0);
    }
}
