use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::backend::{DetectorBackend, Frame, RunningMode};
use crate::detect::result::{Category, Detection, DetectionOutcome};
use crate::geometry::Rect;

const STUB_LABELS: [&str; 6] = ["person", "cat", "dog", "chair", "bottle", "bicycle"];

// The digest yields 4 bytes per synthetic detection; 32-byte digests cap the
// emitted count at 8 regardless of the configured maximum.
const MAX_STUB_DETECTIONS: usize = 8;

/// Stub backend for tests and the demo binary.
///
/// Detections are a pure function of the frame bytes: the pixel digest seeds
/// box geometry, labels and scores, so the same frame always produces the
/// same outcome. Boxes always lie inside the frame.
pub struct StubBackend {
    max_results: usize,
}

impl StubBackend {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results: max_results.clamp(1, MAX_STUB_DETECTIONS),
        }
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn supports(&self, _mode: RunningMode) -> bool {
        true
    }

    fn detect(&mut self, frame: Frame<'_>, _timestamp_ms: u64) -> Result<DetectionOutcome> {
        let digest: [u8; 32] = Sha256::digest(frame.pixels).into();
        let count = 1 + (digest[0] as usize) % self.max_results;

        let frame_width = frame.width as f32;
        let frame_height = frame.height as f32;

        let mut detections = Vec::with_capacity(count);
        for i in 0..count {
            let seed = &digest[i * 4..i * 4 + 4];
            let x = seed[0] as f32 / 255.0 * frame_width * 0.5;
            let y = seed[1] as f32 / 255.0 * frame_height * 0.5;
            let width = (1.0 + seed[2] as f32) / 256.0 * frame_width * 0.5;
            let height = (1.0 + seed[3] as f32) / 256.0 * frame_height * 0.5;

            let label = STUB_LABELS[seed[1] as usize % STUB_LABELS.len()];
            let score = 0.5 + seed[2] as f32 / 512.0;

            detections.push(Detection {
                bounding_box: Rect::new(x, y, width, height),
                categories: vec![Category::new(label, score)],
            });
        }

        Ok(DetectionOutcome { detections })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pixels: &[u8]) -> Frame<'_> {
        Frame {
            pixels,
            width: 64,
            height: 48,
        }
    }

    #[test]
    fn same_frame_same_outcome() {
        let mut backend = StubBackend::new(3);
        let pixels = vec![7u8; 64 * 48 * 3];
        let first = backend.detect(frame(&pixels), 0).unwrap();
        let second = backend.detect(frame(&pixels), 100).unwrap();
        assert_eq!(first.detections, second.detections);
    }

    #[test]
    fn boxes_stay_inside_frame() {
        let mut backend = StubBackend::new(8);
        let pixels: Vec<u8> = (0..64 * 48 * 3).map(|i| (i % 251) as u8).collect();
        let outcome = backend.detect(frame(&pixels), 0).unwrap();
        assert!(!outcome.detections.is_empty());
        for detection in &outcome.detections {
            let rect = detection.bounding_box;
            assert!(rect.x >= 0.0 && rect.max_x() <= 64.0);
            assert!(rect.y >= 0.0 && rect.max_y() <= 48.0);
        }
    }

    #[test]
    fn respects_max_results() {
        let mut backend = StubBackend::new(2);
        let pixels = vec![0u8; 64 * 48 * 3];
        let outcome = backend.detect(frame(&pixels), 0).unwrap();
        assert!(outcome.detections.len() <= 2);
    }

    #[test]
    fn every_detection_carries_a_scored_label() {
        let mut backend = StubBackend::new(4);
        let pixels = vec![42u8; 64 * 48 * 3];
        let outcome = backend.detect(frame(&pixels), 0).unwrap();
        for detection in &outcome.detections {
            let category = detection.top_category().expect("stub always labels");
            assert!(category.name.is_some());
            assert!((0.0..=1.0).contains(&category.score));
        }
    }
}
