//! Capture error types

use contracts::DeviceError;
use thiserror::Error;

/// Capture-specific error
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Frame resolution does not match the configured geometry
    #[error(
        "invalid {stream} frame resolution: {got_width}x{got_height}, expected {expected_width}x{expected_height}"
    )]
    ResolutionMismatch {
        stream: &'static str,
        got_width: u32,
        got_height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    /// Frame payload length does not match the frame's own geometry
    #[error("{stream} payload is {got} bytes, expected {expected}")]
    PayloadSize {
        stream: &'static str,
        got: usize,
        expected: usize,
    },

    /// A transiently-failing call exhausted its retry budget
    #[error("retry budget exhausted for {op} after {retries} retries: {source}")]
    RetryExhausted {
        op: String,
        retries: u32,
        #[source]
        source: DeviceError,
    },

    /// No sensor advertises the visual preset option
    #[error("no sensor supports the visual preset option")]
    PresetUnsupported,

    /// The configured preset name matched no option value description
    #[error("visual preset '{name}' not found on this device")]
    PresetNotFound { name: String },

    /// Laser power write did not stick
    #[error("laser power readback {got} does not match requested {expected}")]
    LaserPowerReadback { got: f32, expected: f32 },

    /// Wrapped device error
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Result alias
pub type Result<T> = std::result::Result<T, CaptureError>;
