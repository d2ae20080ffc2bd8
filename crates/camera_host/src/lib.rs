//! # Camera Host
//!
//! Device-access layer behind the [`contracts::CameraHost`] seam.
//!
//! The vendor SDK backend lives behind the trait; this crate ships the
//! simulated implementation used by tests, demos, and hardware-free runs.
//! Simulated sensors are fully scriptable: capability sets, busy-failure
//! injection for retry scenarios, and write logs for assertions.

mod simulated;

pub use simulated::{FramePlan, HostProbe, SimulatedHost, SimulatedHostConfig, SimulatedSensor};
