//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Wall-clock `Instant`s drive the capture loop and the tuning timer
//! - Frame durations are whole milliseconds, floored at 1 to keep the
//!   throughput estimate division-safe

mod cancel;
mod config;
mod device;
mod error;
mod frame;
mod options;

pub use cancel::CancelToken;
pub use config::*;
pub use device::{CameraHost, DeviceDescriptor, FrameSource, SensorControl};
pub use error::*;
pub use frame::*;
pub use options::*;
