//! Frame payload structures produced by a [`FrameSource`](crate::FrameSource).

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single depth sample: 16-bit unsigned per pixel, little endian.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthFrame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel payload, `width * height * 2` bytes
    pub data: Bytes,
}

/// A single color sample: 3 bytes per pixel (RGB8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorFrame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel payload, `width * height * 3` bytes
    pub data: Bytes,
}

/// A coordinated depth + color pair captured at approximately the same
/// instant. Either modality may be absent; a set missing one is treated
/// as end of stream by the ingest loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSet {
    pub depth: Option<DepthFrame>,
    pub color: Option<ColorFrame>,
}

impl FrameSet {
    /// Both modalities present
    pub fn is_complete(&self) -> bool {
        self.depth.is_some() && self.color.is_some()
    }
}

impl DepthFrame {
    /// Expected payload size in bytes for the frame's own geometry
    pub fn expected_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 2
    }
}

impl ColorFrame {
    /// Expected payload size in bytes for the frame's own geometry
    pub fn expected_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}
