use crate::geometry::{Rect, Size};

/// One label candidate for a detection.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    /// Human-readable class name. Backends may omit it.
    pub name: Option<String>,
    /// Confidence in [0, 1].
    pub score: f32,
}

impl Category {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: Some(name.into()),
            score,
        }
    }

    pub fn unnamed(score: f32) -> Self {
        Self { name: None, score }
    }
}

/// One recognized object instance.
///
/// The bounding box is in source-image pixel coordinates (top-left origin,
/// y-down). Categories are ordered by descending score; only the first is
/// used for display.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bounding_box: Rect,
    pub categories: Vec<Category>,
}

impl Detection {
    pub fn top_category(&self) -> Option<&Category> {
        self.categories.first()
    }
}

/// Output of a single inference call.
#[derive(Clone, Debug, Default)]
pub struct DetectionOutcome {
    pub detections: Vec<Detection>,
}

/// A detection run handed back to callers: the outcomes plus timing.
///
/// For still images and live-stream frames `outcomes` holds one entry. For
/// video it holds one entry per stepped frame and `inference_time_ms` is the
/// per-frame average.
#[derive(Clone, Debug, Default)]
pub struct ResultBundle {
    pub inference_time_ms: f64,
    pub outcomes: Vec<DetectionOutcome>,
    /// Pixel size of the frames that were fed to the detector. Populated by
    /// the video path, where callers have no other handle on the frame size.
    pub frame_size: Size,
}
