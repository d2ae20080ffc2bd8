//! Capture metrics recording and running statistics.

use metrics::{counter, gauge, histogram};

/// Record one captured frame pair
///
/// Called once per completed loop iteration.
pub fn record_frame_captured(duration_ms: u64, fps: u64) {
    counter!("rgbd_capture_frames_total").increment(1);
    histogram!("rgbd_capture_frame_duration_ms").record(duration_ms as f64);
    gauge!("rgbd_capture_fps").set(fps as f64);
}

/// Record the outcome of one tuning sweep
pub fn record_tuning_sweep(applied: u32, skipped: u32) {
    counter!("rgbd_capture_tuning_sweeps_total").increment(1);
    counter!("rgbd_capture_tuning_mutations_applied_total").increment(applied as u64);
    counter!("rgbd_capture_tuning_mutations_skipped_total").increment(skipped as u64);
}

/// Record a retried device call
pub fn record_retry(op: &str, exhausted: bool) {
    counter!(
        "rgbd_capture_device_retries_total",
        "op" => op.to_string()
    )
    .increment(1);
    if exhausted {
        counter!(
            "rgbd_capture_device_retries_exhausted_total",
            "op" => op.to_string()
        )
        .increment(1);
    }
}

/// Statistics summary for display
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
