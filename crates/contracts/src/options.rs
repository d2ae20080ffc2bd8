//! Tunable sensor options and the region-of-interest rectangle.

use serde::{Deserialize, Serialize};

/// Tunable sensor option identifiers
///
/// The subset of the vendor option table the capture pipeline touches.
/// Values are scalar `f32` like the underlying SDK; boolean options use
/// 0.0 / 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningOption {
    /// Auto-exposure toggle
    AutoExposure,
    /// Active-illumination emitter toggle
    EmitterEnabled,
    /// Laser power level
    LaserPower,
    /// Vendor visual preset selector
    VisualPreset,
}

impl TuningOption {
    /// Stable lowercase name for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::AutoExposure => "auto_exposure",
            Self::EmitterEnabled => "emitter_enabled",
            Self::LaserPower => "laser_power",
            Self::VisualPreset => "visual_preset",
        }
    }
}

/// Valid value range for a tunable option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

/// Rectangular sub-window of the depth field of view used to bias
/// auto-exposure metering. Pixel coordinates, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl RegionOfInterest {
    /// Middle 20% of each axis: min = 0.4 * dim, max = 0.6 * dim.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            min_x: (width as f64 * 0.4) as u32,
            min_y: (height as f64 * 0.4) as u32,
            max_x: (width as f64 * 0.6) as u32,
            max_y: (height as f64 * 0.6) as u32,
        }
    }
}
