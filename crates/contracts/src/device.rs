//! Device access traits - vendor SDK abstraction
//!
//! Defines a unified interface over the camera vendor's device layer,
//! decoupling the capture pipeline from concrete SDK bindings.
//! Supports unified handling of real devices and simulated test devices.

use std::time::Duration;

use crate::{DeviceError, FrameSet, OptionRange, RegionOfInterest, StreamConfig, TuningOption};

/// Identity of the opened device, for logs and diagnostics
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    /// Product name (e.g., "D435i")
    pub name: String,
    /// Device serial number
    pub serial: String,
    /// Number of discovered sensors
    pub sensor_count: usize,
}

/// Tunable sensor handle
///
/// Abstracts one sensor of the opened device: capability query, scalar
/// option read/write, and (conditionally) region-of-interest write.
/// Handles are created once at session start and owned by the capture
/// session for the process lifetime.
///
/// # Design Principles
///
/// 1. **Capability first**: callers must check [`supports`](Self::supports)
///    (or tolerate `OptionUnsupported`) before mutating
/// 2. **Scalar values**: options are `f32` like the vendor SDK; boolean
///    options read back 0.0 / 1.0
/// 3. **Transient failures**: a busy device surfaces `DeviceError::Busy`,
///    which retry helpers may re-attempt
pub trait SensorControl: Send {
    /// Sensor name for logs (e.g., "stereo", "rgb")
    fn name(&self) -> &str;

    /// Whether the sensor exposes the named tunable option
    fn supports(&self, option: TuningOption) -> bool;

    /// Read the current option value
    fn option(&self, option: TuningOption) -> Result<f32, DeviceError>;

    /// Write a new option value
    fn set_option(&mut self, option: TuningOption, value: f32) -> Result<(), DeviceError>;

    /// Valid range for an option
    fn option_range(&self, option: TuningOption) -> Result<OptionRange, DeviceError>;

    /// Human-readable description for a discrete option value, if the
    /// backend provides one (used to match visual presets by name)
    fn describe_option_value(&self, option: TuningOption, value: f32) -> Option<String>;

    /// Whether the sensor exposes a region-of-interest control
    fn supports_roi(&self) -> bool;

    /// Write the auto-exposure metering region
    fn set_roi(&mut self, roi: RegionOfInterest) -> Result<(), DeviceError>;
}

/// Streaming frame source
///
/// Delivers coordinated frame sets once streaming has started.
pub trait FrameSource: Send {
    /// Block up to `timeout` until the next coordinated frame set is
    /// available. Expiry yields `DeviceError::FrameTimeout`.
    fn wait_for_frames(&mut self, timeout: Duration) -> Result<FrameSet, DeviceError>;

    /// Halt frame delivery. Idempotent.
    fn stop(&mut self);
}

/// Camera device host
///
/// Top-level entry point: opens exactly one connected device, enumerates
/// its sensors, and starts the streaming pipeline.
pub trait CameraHost: Send {
    /// Open the single connected device.
    ///
    /// # Errors
    /// - `NoDevice` when nothing is connected
    /// - `UnexpectedDeviceCount` when more than one device is connected
    fn open(&mut self) -> Result<DeviceDescriptor, DeviceError>;

    /// Enumerate the opened device's sensors
    fn sensors(&mut self) -> Result<Vec<Box<dyn SensorControl>>, DeviceError>;

    /// Start delivering coordinated depth + color frame sets for the
    /// given stream geometry
    fn start_streaming(&mut self, stream: &StreamConfig)
        -> Result<Box<dyn FrameSource>, DeviceError>;
}
