//! Simulated camera host
//!
//! A hardware-free implementation of the device traits, supporting
//! injected failure scenarios for retry and abort testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use contracts::{
    CameraHost, ColorFrame, DepthFrame, DeviceDescriptor, DeviceError, FrameSet, FrameSource,
    OptionRange, RegionOfInterest, SensorControl, StreamConfig, TuningOption,
};
use tracing::{debug, instrument};

/// Frame delivery script for the simulated source
#[derive(Debug, Clone)]
pub struct FramePlan {
    /// Complete pairs to serve before the color modality drops out
    /// (None = unlimited)
    pub complete_frames: Option<u64>,

    /// Serve a depth frame one pixel narrower than configured at this
    /// frame index (resolution-mismatch scenarios)
    pub bad_depth_at: Option<u64>,

    /// Fail the frame wait with a timeout at this frame index
    /// (wait-expiry scenarios)
    pub fail_wait_at: Option<u64>,

    /// Simulated inter-frame delay, to mimic a real camera's cadence
    pub frame_interval: Duration,
}

impl Default for FramePlan {
    fn default() -> Self {
        Self {
            complete_frames: None,
            bad_depth_at: None,
            fail_wait_at: None,
            frame_interval: Duration::ZERO,
        }
    }
}

/// Simulated host configuration
#[derive(Debug, Clone)]
pub struct SimulatedHostConfig {
    /// Number of "connected" devices reported to `open()`
    pub device_count: usize,
    /// Product name
    pub name: String,
    /// Device serial number
    pub serial: String,
    /// Frame delivery script
    pub plan: FramePlan,
}

impl Default for SimulatedHostConfig {
    fn default() -> Self {
        Self {
            device_count: 1,
            name: "Simulated D400".to_string(),
            serial: "SIM0001".to_string(),
            plan: FramePlan::default(),
        }
    }
}

struct SensorState {
    name: String,
    supported: HashSet<TuningOption>,
    options: HashMap<TuningOption, f32>,
    ranges: HashMap<TuningOption, OptionRange>,
    /// Visual preset value descriptions, keyed by discrete value
    preset_descriptions: HashMap<i32, String>,
    roi_supported: bool,
    roi: Option<RegionOfInterest>,
    /// Every successful option write, in order
    writes: Vec<(TuningOption, f32)>,
    roi_writes: Vec<RegionOfInterest>,
    /// Remaining injected busy failures per option write
    busy_budget: HashMap<TuningOption, u32>,
    roi_busy_budget: u32,
    /// Model a device that silently drops auto-exposure re-enable writes
    ignore_ae_enable: bool,
}

/// Scriptable simulated sensor
///
/// Cloning yields another view onto the same state, so tests can keep a
/// probe while the capture session owns the boxed handle.
#[derive(Clone)]
pub struct SimulatedSensor {
    name: Arc<str>,
    state: Arc<Mutex<SensorState>>,
}

impl SimulatedSensor {
    /// Stereo module: auto exposure, emitter, laser power, visual preset,
    /// and a region-of-interest control
    pub fn stereo(name: &str) -> Self {
        let mut supported = HashSet::new();
        supported.insert(TuningOption::AutoExposure);
        supported.insert(TuningOption::EmitterEnabled);
        supported.insert(TuningOption::LaserPower);
        supported.insert(TuningOption::VisualPreset);

        let mut options = HashMap::new();
        options.insert(TuningOption::AutoExposure, 1.0);
        options.insert(TuningOption::EmitterEnabled, 0.0);
        options.insert(TuningOption::LaserPower, 150.0);
        options.insert(TuningOption::VisualPreset, 0.0);

        let mut ranges = HashMap::new();
        ranges.insert(
            TuningOption::AutoExposure,
            OptionRange {
                min: 0.0,
                max: 1.0,
                step: 1.0,
                default: 1.0,
            },
        );
        ranges.insert(
            TuningOption::EmitterEnabled,
            OptionRange {
                min: 0.0,
                max: 1.0,
                step: 1.0,
                default: 1.0,
            },
        );
        ranges.insert(
            TuningOption::LaserPower,
            OptionRange {
                min: 0.0,
                max: 360.0,
                step: 30.0,
                default: 150.0,
            },
        );
        ranges.insert(
            TuningOption::VisualPreset,
            OptionRange {
                min: 0.0,
                max: 4.0,
                step: 1.0,
                default: 0.0,
            },
        );

        let mut preset_descriptions = HashMap::new();
        preset_descriptions.insert(0, "Custom".to_string());
        preset_descriptions.insert(1, "High Accuracy".to_string());
        preset_descriptions.insert(2, "High Density".to_string());
        preset_descriptions.insert(3, "Hand".to_string());

        Self {
            name: Arc::from(name),
            state: Arc::new(Mutex::new(SensorState {
                name: name.to_string(),
                supported,
                options,
                ranges,
                preset_descriptions,
                roi_supported: true,
                roi: None,
                writes: Vec::new(),
                roi_writes: Vec::new(),
                busy_budget: HashMap::new(),
                roi_busy_budget: 0,
                ignore_ae_enable: false,
            })),
        }
    }

    /// RGB module: auto exposure and a region-of-interest control only
    pub fn rgb(name: &str) -> Self {
        let sensor = Self::stereo(name);
        {
            let mut state = sensor.state.lock().unwrap();
            for option in [
                TuningOption::EmitterEnabled,
                TuningOption::LaserPower,
                TuningOption::VisualPreset,
            ] {
                state.supported.remove(&option);
                state.options.remove(&option);
                state.ranges.remove(&option);
            }
            state.preset_descriptions.clear();
        }
        sensor
    }

    /// Remove an advertised capability
    pub fn without(self, option: TuningOption) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.supported.remove(&option);
        }
        self
    }

    /// Remove the region-of-interest control
    pub fn without_roi(self) -> Self {
        self.state.lock().unwrap().roi_supported = false;
        self
    }

    /// Make the next `times` writes of `option` fail with a busy error
    pub fn fail_set_option(self, option: TuningOption, times: u32) -> Self {
        self.state.lock().unwrap().busy_budget.insert(option, times);
        self
    }

    /// Make the next `times` region-of-interest writes fail busy
    pub fn fail_set_roi(self, times: u32) -> Self {
        self.state.lock().unwrap().roi_busy_budget = times;
        self
    }

    /// Model a device that drops auto-exposure re-enable writes: the write
    /// is accepted but the readback keeps reporting disabled
    pub fn ignore_auto_exposure_enable(self) -> Self {
        self.state.lock().unwrap().ignore_ae_enable = true;
        self
    }

    // ===== Probes for assertions =====

    /// All successful option writes, in order
    pub fn writes(&self) -> Vec<(TuningOption, f32)> {
        self.state.lock().unwrap().writes.clone()
    }

    /// All successful region-of-interest writes, in order
    pub fn roi_writes(&self) -> Vec<RegionOfInterest> {
        self.state.lock().unwrap().roi_writes.clone()
    }

    /// Current stored option value
    pub fn current(&self, option: TuningOption) -> Option<f32> {
        self.state.lock().unwrap().options.get(&option).copied()
    }
}

impl SensorControl for SimulatedSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, option: TuningOption) -> bool {
        self.state.lock().unwrap().supported.contains(&option)
    }

    fn option(&self, option: TuningOption) -> Result<f32, DeviceError> {
        let state = self.state.lock().unwrap();
        if !state.supported.contains(&option) {
            return Err(DeviceError::OptionUnsupported {
                sensor: state.name.clone(),
                option,
            });
        }
        Ok(state.options.get(&option).copied().unwrap_or(0.0))
    }

    fn set_option(&mut self, option: TuningOption, value: f32) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.supported.contains(&option) {
            return Err(DeviceError::OptionUnsupported {
                sensor: state.name.clone(),
                option,
            });
        }

        if let Some(remaining) = state.busy_budget.get_mut(&option) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DeviceError::busy(
                    "set_option",
                    format!("{}, {}", option.name(), value),
                ));
            }
        }

        state.writes.push((option, value));

        let dropped = option == TuningOption::AutoExposure && value > 0.0 && state.ignore_ae_enable;
        if !dropped {
            state.options.insert(option, value);
        }

        debug!(sensor = %state.name, option = option.name(), value, dropped, "option written");
        Ok(())
    }

    fn option_range(&self, option: TuningOption) -> Result<OptionRange, DeviceError> {
        let state = self.state.lock().unwrap();
        state.ranges.get(&option).copied().ok_or_else(|| {
            DeviceError::OptionUnsupported {
                sensor: state.name.clone(),
                option,
            }
        })
    }

    fn describe_option_value(&self, option: TuningOption, value: f32) -> Option<String> {
        if option != TuningOption::VisualPreset {
            return None;
        }
        self.state
            .lock()
            .unwrap()
            .preset_descriptions
            .get(&(value as i32))
            .cloned()
    }

    fn supports_roi(&self) -> bool {
        self.state.lock().unwrap().roi_supported
    }

    fn set_roi(&mut self, roi: RegionOfInterest) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.roi_supported {
            return Err(DeviceError::RoiUnsupported {
                sensor: state.name.clone(),
            });
        }

        if state.roi_busy_budget > 0 {
            state.roi_busy_budget -= 1;
            return Err(DeviceError::busy(
                "set_roi",
                format!(
                    "{}..{}, {}..{}",
                    roi.min_x, roi.max_x, roi.min_y, roi.max_y
                ),
            ));
        }

        state.roi = Some(roi);
        state.roi_writes.push(roi);
        Ok(())
    }
}

/// Shared stream lifecycle flags, usable after the host has been moved
/// into a capture session
#[derive(Clone)]
pub struct HostProbe {
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl HostProbe {
    /// Whether streaming was started
    pub fn stream_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Whether the frame source was stopped
    pub fn stream_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Simulated camera host
///
/// Serves scripted sensors and a scripted frame source. Keep a clone of
/// a [`SimulatedSensor`] (or use [`SimulatedHost::sensor`]) to assert on
/// device state after a run.
pub struct SimulatedHost {
    config: SimulatedHostConfig,
    sensors: Vec<SimulatedSensor>,
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl SimulatedHost {
    /// Host with the default sensor pair (stereo + rgb)
    pub fn new(config: SimulatedHostConfig) -> Self {
        let sensors = vec![SimulatedSensor::stereo("stereo"), SimulatedSensor::rgb("rgb")];
        Self::with_sensors(config, sensors)
    }

    /// Host with caller-provided sensors
    pub fn with_sensors(config: SimulatedHostConfig, sensors: Vec<SimulatedSensor>) -> Self {
        Self {
            config,
            sensors,
            started: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Probe view of a sensor by name
    pub fn sensor(&self, name: &str) -> Option<SimulatedSensor> {
        self.sensors
            .iter()
            .find(|s| &*s.name == name)
            .cloned()
    }

    /// Whether streaming was started
    pub fn stream_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Whether the frame source was stopped
    pub fn stream_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Lifecycle probe that outlives the host
    pub fn probe(&self) -> HostProbe {
        HostProbe {
            started: self.started.clone(),
            stopped: self.stopped.clone(),
        }
    }
}

impl CameraHost for SimulatedHost {
    #[instrument(name = "simulated_open", skip(self))]
    fn open(&mut self) -> Result<DeviceDescriptor, DeviceError> {
        match self.config.device_count {
            0 => Err(DeviceError::NoDevice),
            1 => Ok(DeviceDescriptor {
                name: self.config.name.clone(),
                serial: self.config.serial.clone(),
                sensor_count: self.sensors.len(),
            }),
            count => Err(DeviceError::UnexpectedDeviceCount { count }),
        }
    }

    fn sensors(&mut self) -> Result<Vec<Box<dyn SensorControl>>, DeviceError> {
        Ok(self
            .sensors
            .iter()
            .cloned()
            .map(|s| Box::new(s) as Box<dyn SensorControl>)
            .collect())
    }

    fn start_streaming(
        &mut self,
        stream: &StreamConfig,
    ) -> Result<Box<dyn FrameSource>, DeviceError> {
        self.started.store(true, Ordering::SeqCst);
        self.stopped.store(false, Ordering::SeqCst);
        Ok(Box::new(SimulatedFrameSource {
            stream: stream.clone(),
            plan: self.config.plan.clone(),
            served: 0,
            stopped: self.stopped.clone(),
        }))
    }
}

struct SimulatedFrameSource {
    stream: StreamConfig,
    plan: FramePlan,
    served: u64,
    stopped: Arc<AtomicBool>,
}

impl FrameSource for SimulatedFrameSource {
    fn wait_for_frames(&mut self, timeout: Duration) -> Result<FrameSet, DeviceError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(DeviceError::StreamClosed);
        }

        if !self.plan.frame_interval.is_zero() {
            std::thread::sleep(self.plan.frame_interval.min(timeout));
        }

        let index = self.served;
        self.served += 1;

        if self.plan.fail_wait_at == Some(index) {
            return Err(DeviceError::FrameTimeout {
                waited_ms: timeout.as_millis() as u64,
            });
        }

        let depth_width = if self.plan.bad_depth_at == Some(index) {
            self.stream.depth_width - 1
        } else {
            self.stream.depth_width
        };

        let depth = synthetic_depth(depth_width, self.stream.depth_height);

        let past_plan = self
            .plan
            .complete_frames
            .is_some_and(|budget| index >= budget);
        let color = if past_plan {
            None
        } else {
            Some(synthetic_color(
                self.stream.color_width,
                self.stream.color_height,
            ))
        };

        Ok(FrameSet {
            depth: Some(depth),
            color,
        })
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

fn synthetic_depth(width: u32, height: u32) -> DepthFrame {
    let mut data = vec![0u8; width as usize * height as usize * 2];
    // Horizontal ramp, enough to distinguish frames from zero fill
    for (i, chunk) in data.chunks_exact_mut(2).enumerate() {
        let value = (i % width.max(1) as usize) as u16;
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    DepthFrame {
        width,
        height,
        data: Bytes::from(data),
    }
}

fn synthetic_color(width: u32, height: u32) -> ColorFrame {
    let data = vec![0x7fu8; width as usize * height as usize * 3];
    ColorFrame {
        width,
        height,
        data: Bytes::from(data),
    }
}
