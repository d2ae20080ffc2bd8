//! Rolling frame-time window and FPS estimate.
//!
//! Fixed-capacity ring of recent frame durations plus a running sum.
//! Invariant: the sum always equals the sum of resident entries; evicting
//! the oldest entry subtracts its value. Durations and averages are
//! floored at 1 ms so the FPS division is always defined.

use ringbuf::{traits::*, HeapRb};

/// Window capacity used by the capture session
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;

/// Fixed-capacity moving average over frame durations (ms)
pub struct FpsWindow {
    durations: HeapRb<u64>,
    sum: u64,
}

impl FpsWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            durations: HeapRb::new(capacity.max(1)),
            sum: 0,
        }
    }

    /// Record one frame duration, evicting the oldest entry when the
    /// window is full. Zero durations are recorded as 1 ms.
    pub fn record(&mut self, duration_ms: u64) {
        let duration_ms = duration_ms.max(1);

        if self.durations.is_full() {
            if let Some(oldest) = self.durations.try_pop() {
                self.sum -= oldest;
            }
        }

        // Cannot fail: an eviction just guaranteed a free slot
        let _ = self.durations.try_push(duration_ms);
        self.sum += duration_ms;
    }

    pub fn len(&self) -> usize {
        self.durations.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Running sum of resident durations
    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// Mean duration over the window, floored at 1 ms
    pub fn average_ms(&self) -> u64 {
        if self.durations.is_empty() {
            return 1;
        }
        (self.sum / self.durations.occupied_len() as u64).max(1)
    }

    /// Smoothed frames-per-second estimate
    pub fn fps(&self) -> u64 {
        1000 / self.average_ms()
    }
}
