use anyhow::Result;

use crate::detect::result::DetectionOutcome;

/// How detection requests arrive at a backend.
///
/// - `StillImage`: one-shot, timestamp is ignored.
/// - `Video`: frames stepped from a seekable source with monotonic timestamps.
/// - `LiveStream`: frames pushed from a capture pipeline with capture timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunningMode {
    StillImage,
    Video,
    LiveStream,
}

/// Borrowed RGB frame handed to a backend for one inference.
///
/// `pixels` is tightly packed RGB, `width * height * 3` bytes.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
}

/// Detector backend trait.
///
/// This is an opaque-capability boundary: model loading, tensor inference
/// and non-max suppression all live behind it. Implementations are expected
/// to apply their own score-threshold filtering and max-result capping;
/// callers never re-filter the output.
///
/// Implementations must treat the pixel slice as read-only and ephemeral.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Returns true when the backend can serve the given running mode.
    fn supports(&self, mode: RunningMode) -> bool;

    /// Run detection on a frame.
    ///
    /// `timestamp_ms` is the frame's position for video/live-stream modes;
    /// still-image callers pass 0.
    fn detect(&mut self, frame: Frame<'_>, timestamp_ms: u64) -> Result<DetectionOutcome>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
