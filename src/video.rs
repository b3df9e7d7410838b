//! Frame-addressable video input.
//!
//! The video detection path steps through a source at a fixed inference
//! interval rather than decoding every frame. Sources only need to report
//! their duration and decode a frame at a requested timestamp.

use anyhow::Result;

use crate::detect::Frame;
use crate::geometry::Size;

/// Owned RGB frame decoded from a video source.
pub struct OwnedFrame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl OwnedFrame {
    pub fn as_frame(&self) -> Frame<'_> {
        Frame {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// A seekable video that can decode a frame at an arbitrary timestamp.
pub trait VideoSource {
    /// Total duration in milliseconds.
    fn duration_ms(&self) -> f64;

    /// Decode the frame nearest to `timestamp_ms`.
    fn frame_at(&mut self, timestamp_ms: u64) -> Result<OwnedFrame>;
}

/// Synthetic video source for tests and the demo binary.
///
/// Frames are a gradient over the pixel index shifted by the timestamp, so
/// every timestamp yields a distinct but reproducible frame.
pub struct SyntheticVideoSource {
    duration_ms: f64,
    width: u32,
    height: u32,
    frames_served: u64,
}

impl SyntheticVideoSource {
    pub fn new(duration_ms: f64, width: u32, height: u32) -> Self {
        Self {
            duration_ms,
            width,
            height,
            frames_served: 0,
        }
    }

    pub fn frames_served(&self) -> u64 {
        self.frames_served
    }
}

impl VideoSource for SyntheticVideoSource {
    fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    fn frame_at(&mut self, timestamp_ms: u64) -> Result<OwnedFrame> {
        self.frames_served += 1;
        let pixel_count = (self.width * self.height * 3) as usize;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + timestamp_ms) % 256) as u8;
        }
        Ok(OwnedFrame {
            pixels,
            width: self.width,
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_frames_vary_by_timestamp() {
        let mut source = SyntheticVideoSource::new(1000.0, 8, 8);
        let first = source.frame_at(0).unwrap();
        let again = source.frame_at(0).unwrap();
        let later = source.frame_at(40).unwrap();
        assert_eq!(first.pixels, again.pixels);
        assert_ne!(first.pixels, later.pixels);
        assert_eq!(source.frames_served(), 3);
    }
}
