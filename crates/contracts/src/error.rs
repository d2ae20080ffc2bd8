//! Layered error definitions
//!
//! Categorized by source: config / device / stream

use thiserror::Error;

use crate::TuningOption;

/// Unified error type for configuration and device access
#[derive(Debug, Error)]
pub enum DeviceError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Device Errors =====
    /// No capture device connected
    #[error("no capture device connected")]
    NoDevice,

    /// Wrong number of connected devices
    #[error("expected exactly one capture device, found {count}")]
    UnexpectedDeviceCount { count: usize },

    /// Device reported busy while servicing a control call.
    /// The only transient error kind: callers may retry it.
    #[error("device busy calling {op}({args})")]
    Busy { op: String, args: String },

    /// Sensor does not expose the requested tunable option
    #[error("sensor '{sensor}' does not support option {option:?}")]
    OptionUnsupported {
        sensor: String,
        option: TuningOption,
    },

    /// Sensor does not expose a region-of-interest control
    #[error("sensor '{sensor}' does not support region of interest")]
    RoiUnsupported { sensor: String },

    // ===== Stream Errors =====
    /// Frame wait expired
    #[error("timed out after {waited_ms}ms waiting for frames")]
    FrameTimeout { waited_ms: u64 },

    /// Frame source already stopped
    #[error("frame stream closed")]
    StreamClosed,

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend/SDK error with the failing call's name and arguments
    #[error("device error calling {op}({args}): {message}")]
    Backend {
        op: String,
        args: String,
        message: String,
    },
}

impl DeviceError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create device-busy error
    pub fn busy(op: impl Into<String>, args: impl Into<String>) -> Self {
        Self::Busy {
            op: op.into(),
            args: args.into(),
        }
    }

    /// Create backend error
    pub fn backend(
        op: impl Into<String>,
        args: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            op: op.into(),
            args: args.into(),
            message: message.into(),
        }
    }

    /// Whether a retry helper may re-attempt the failed call
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
