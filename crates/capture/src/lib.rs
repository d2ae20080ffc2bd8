//! # Capture
//!
//! The capture core: blocking frame ingest loop, periodic tuning
//! controller, rolling FPS estimator, bounded retry helper, and the
//! session orchestrator tying them together.
//!
//! Single-threaded cooperative model: one logical thread alternates
//! between blocking frame waits and, on interval expiry, a blocking
//! tuning sweep. Cancellation is polled once per iteration boundary.

mod error;
mod fps;
mod ingest;
mod retry;
mod session;
mod startup;
mod stats;
mod tuning;

pub use error::{CaptureError, Result};
pub use fps::{FpsWindow, DEFAULT_WINDOW_CAPACITY};
pub use ingest::{ingest, FrameBuffers, IngestOutcome};
pub use retry::{with_retry, RetryPolicy};
pub use session::CaptureSession;
pub use startup::{apply_visual_preset, configure_illumination};
pub use stats::{CaptureStats, StopReason};
pub use tuning::{SweepReport, TuningController};
