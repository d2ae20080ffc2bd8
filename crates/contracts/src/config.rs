//! CaptureConfig - Config Loader output
//!
//! Describes the full capture session: stream geometry, visual preset,
//! periodic tuning cadence, and the bounded retry policy.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete capture session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CaptureConfig {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Stream geometry and frame-wait behavior
    #[serde(default)]
    #[validate(nested)]
    pub stream: StreamConfig,

    /// Vendor visual preset applied at startup
    #[serde(default)]
    pub preset: PresetConfig,

    /// Periodic tuning sweep cadence
    #[serde(default)]
    pub tuning: TuningConfig,

    /// Bounded retry policy for busy-device responses
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Stream geometry: resolutions, frame rate, wait timeout
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StreamConfig {
    /// Depth stream width (pixels)
    #[serde(default = "default_depth_width")]
    #[validate(range(min = 1))]
    pub depth_width: u32,

    /// Depth stream height (pixels)
    #[serde(default = "default_depth_height")]
    #[validate(range(min = 1))]
    pub depth_height: u32,

    /// Color stream width (pixels)
    #[serde(default = "default_color_width")]
    #[validate(range(min = 1))]
    pub color_width: u32,

    /// Color stream height (pixels)
    #[serde(default = "default_color_height")]
    #[validate(range(min = 1))]
    pub color_height: u32,

    /// Requested frame rate (Hz)
    #[serde(default = "default_framerate")]
    #[validate(range(min = 1))]
    pub framerate: u32,

    /// Blocking frame-wait timeout (ms)
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Frame resolution validation mode
    #[serde(default)]
    pub validation: ValidationMode,
}

/// How incoming frame resolutions are checked against the configured
/// geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Frames must match the configured resolution exactly
    #[default]
    Strict,
    /// Frames only need non-zero dimensions
    Relaxed,
}

/// Visual preset selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfig {
    /// Preset description to match (e.g., "High Accuracy")
    #[serde(default = "default_preset_name")]
    pub name: String,
}

/// Periodic tuning sweep cadence and settle behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Whether the periodic sweep runs at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Delay before the first sweep (ms)
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,

    /// Fixed increment added to the interval after each sweep (ms)
    #[serde(default = "default_interval_step_ms")]
    pub interval_step_ms: u64,

    /// Pause after each hardware option write (ms)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

/// Bounded retry policy for transient busy-device responses
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries allowed after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts (ms)
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl StreamConfig {
    /// Depth pixels per frame at the configured geometry
    pub fn depth_pixels(&self) -> usize {
        self.depth_width as usize * self.depth_height as usize
    }

    /// Color payload bytes per frame at the configured geometry
    pub fn color_bytes(&self) -> usize {
        self.color_width as usize * self.color_height as usize * 3
    }
}

fn default_depth_width() -> u32 {
    1280
}

fn default_depth_height() -> u32 {
    720
}

fn default_color_width() -> u32 {
    1920
}

fn default_color_height() -> u32 {
    1080
}

fn default_framerate() -> u32 {
    30
}

fn default_wait_timeout_ms() -> u64 {
    3000
}

fn default_preset_name() -> String {
    "High Accuracy".to_string()
}

fn default_true() -> bool {
    true
}

fn default_initial_interval_ms() -> u64 {
    5000
}

fn default_interval_step_ms() -> u64 {
    5000
}

fn default_settle_ms() -> u64 {
    200
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    200
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            depth_width: default_depth_width(),
            depth_height: default_depth_height(),
            color_width: default_color_width(),
            color_height: default_color_height(),
            framerate: default_framerate(),
            wait_timeout_ms: default_wait_timeout_ms(),
            validation: ValidationMode::default(),
        }
    }
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            name: default_preset_name(),
        }
    }
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            initial_interval_ms: default_initial_interval_ms(),
            interval_step_ms: default_interval_step_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}
