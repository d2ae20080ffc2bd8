//! Frame pair validation and payload copy.
//!
//! Destination buffers are owned by the caller, allocated once for the
//! configured resolution, and overwritten in place each iteration. The
//! copy never writes past the bounds implied by the configured geometry.

use bytemuck::cast_slice_mut;
use contracts::{ColorFrame, DepthFrame, FrameSet, StreamConfig, ValidationMode};

use crate::error::{CaptureError, Result};

/// Caller-owned destination buffers, sized for the configured resolution
pub struct FrameBuffers {
    depth: Vec<u16>,
    color: Vec<u8>,
}

impl FrameBuffers {
    /// Allocate zeroed buffers for the stream geometry
    pub fn for_stream(stream: &StreamConfig) -> Self {
        Self {
            depth: vec![0u16; stream.depth_pixels()],
            color: vec![0u8; stream.color_bytes()],
        }
    }

    /// Depth pixels, row major
    pub fn depth(&self) -> &[u16] {
        &self.depth
    }

    /// Color bytes, RGB8 row major
    pub fn color(&self) -> &[u8] {
        &self.color
    }
}

/// Result of one ingest step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Both modalities validated and copied
    Pair,
    /// At least one modality absent from the set: end of stream
    MissingModality { depth: bool, color: bool },
}

/// Validate a frame set against the configured geometry and copy both
/// payloads into the destination buffers.
///
/// A missing modality is not an error; resolution or payload-size
/// violations are fatal.
pub fn ingest(
    frames: &FrameSet,
    stream: &StreamConfig,
    buffers: &mut FrameBuffers,
) -> Result<IngestOutcome> {
    let (Some(depth), Some(color)) = (&frames.depth, &frames.color) else {
        return Ok(IngestOutcome::MissingModality {
            depth: frames.depth.is_none(),
            color: frames.color.is_none(),
        });
    };

    validate_depth(depth, stream)?;
    validate_color(color, stream)?;

    copy_depth(depth, buffers)?;
    copy_color(color, buffers)?;

    Ok(IngestOutcome::Pair)
}

fn validate_depth(frame: &DepthFrame, stream: &StreamConfig) -> Result<()> {
    let ok = match stream.validation {
        ValidationMode::Strict => {
            frame.width == stream.depth_width && frame.height == stream.depth_height
        }
        ValidationMode::Relaxed => frame.width > 0 && frame.height > 0,
    };
    if !ok {
        return Err(CaptureError::ResolutionMismatch {
            stream: "depth",
            got_width: frame.width,
            got_height: frame.height,
            expected_width: stream.depth_width,
            expected_height: stream.depth_height,
        });
    }
    Ok(())
}

fn validate_color(frame: &ColorFrame, stream: &StreamConfig) -> Result<()> {
    let ok = match stream.validation {
        ValidationMode::Strict => {
            frame.width == stream.color_width && frame.height == stream.color_height
        }
        ValidationMode::Relaxed => frame.width > 0 && frame.height > 0,
    };
    if !ok {
        return Err(CaptureError::ResolutionMismatch {
            stream: "color",
            got_width: frame.width,
            got_height: frame.height,
            expected_width: stream.color_width,
            expected_height: stream.color_height,
        });
    }
    Ok(())
}

fn copy_depth(frame: &DepthFrame, buffers: &mut FrameBuffers) -> Result<()> {
    if frame.data.len() != frame.expected_bytes() {
        return Err(CaptureError::PayloadSize {
            stream: "depth",
            got: frame.data.len(),
            expected: frame.expected_bytes(),
        });
    }

    // View the u16 destination as bytes; alignment of the source payload
    // is irrelevant this way. In relaxed mode the payload may be smaller
    // or larger than the buffer, so clamp to the destination capacity.
    let dst: &mut [u8] = cast_slice_mut(buffers.depth.as_mut_slice());
    let n = frame.data.len().min(dst.len());
    dst[..n].copy_from_slice(&frame.data[..n]);
    Ok(())
}

fn copy_color(frame: &ColorFrame, buffers: &mut FrameBuffers) -> Result<()> {
    if frame.data.len() != frame.expected_bytes() {
        return Err(CaptureError::PayloadSize {
            stream: "color",
            got: frame.data.len(),
            expected: frame.expected_bytes(),
        });
    }

    let dst = buffers.color.as_mut_slice();
    let n = frame.data.len().min(dst.len());
    dst[..n].copy_from_slice(&frame.data[..n]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn stream() -> StreamConfig {
        StreamConfig {
            depth_width: 4,
            depth_height: 2,
            color_width: 2,
            color_height: 2,
            ..StreamConfig::default()
        }
    }

    fn depth_frame(width: u32, height: u32) -> DepthFrame {
        let pixels: Vec<u16> = (0..width as u16 * height as u16).collect();
        let bytes: Vec<u8> = pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
        DepthFrame {
            width,
            height,
            data: Bytes::from(bytes),
        }
    }

    fn color_frame(width: u32, height: u32) -> ColorFrame {
        ColorFrame {
            width,
            height,
            data: Bytes::from(vec![9u8; width as usize * height as usize * 3]),
        }
    }

    #[test]
    fn test_complete_pair_copied() {
        let stream = stream();
        let mut buffers = FrameBuffers::for_stream(&stream);
        let frames = FrameSet {
            depth: Some(depth_frame(4, 2)),
            color: Some(color_frame(2, 2)),
        };

        let outcome = ingest(&frames, &stream, &mut buffers).unwrap();
        assert_eq!(outcome, IngestOutcome::Pair);
        assert_eq!(buffers.depth(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(buffers.color().iter().all(|&b| b == 9));
    }

    #[test]
    fn test_missing_color_is_end_of_stream() {
        let stream = stream();
        let mut buffers = FrameBuffers::for_stream(&stream);
        let frames = FrameSet {
            depth: Some(depth_frame(4, 2)),
            color: None,
        };

        let outcome = ingest(&frames, &stream, &mut buffers).unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::MissingModality {
                depth: false,
                color: true
            }
        );
    }

    #[test]
    fn test_strict_rejects_narrow_depth() {
        let stream = stream();
        let mut buffers = FrameBuffers::for_stream(&stream);
        let frames = FrameSet {
            depth: Some(depth_frame(3, 2)),
            color: Some(color_frame(2, 2)),
        };

        let err = ingest(&frames, &stream, &mut buffers).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::ResolutionMismatch {
                stream: "depth",
                got_width: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_relaxed_accepts_differing_resolution() {
        let mut stream = stream();
        stream.validation = ValidationMode::Relaxed;
        let mut buffers = FrameBuffers::for_stream(&stream);

        // Larger than configured: copy clamps to the buffer capacity
        let frames = FrameSet {
            depth: Some(depth_frame(8, 2)),
            color: Some(color_frame(3, 2)),
        };
        let outcome = ingest(&frames, &stream, &mut buffers).unwrap();
        assert_eq!(outcome, IngestOutcome::Pair);
        assert_eq!(buffers.depth(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_relaxed_still_rejects_degenerate_frames() {
        let mut stream = stream();
        stream.validation = ValidationMode::Relaxed;
        let mut buffers = FrameBuffers::for_stream(&stream);
        let frames = FrameSet {
            depth: Some(DepthFrame {
                width: 0,
                height: 2,
                data: Bytes::new(),
            }),
            color: Some(color_frame(2, 2)),
        };
        assert!(ingest(&frames, &stream, &mut buffers).is_err());
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let stream = stream();
        let mut buffers = FrameBuffers::for_stream(&stream);
        let frames = FrameSet {
            depth: Some(DepthFrame {
                width: 4,
                height: 2,
                data: Bytes::from(vec![0u8; 7]),
            }),
            color: Some(color_frame(2, 2)),
        };

        let err = ingest(&frames, &stream, &mut buffers).unwrap_err();
        assert!(matches!(err, CaptureError::PayloadSize { stream: "depth", .. }));
    }
}
