//! framesight - detection overlay toolkit
//!
//! This crate wires frame producers (still images, stepped video, live
//! streams) to an on-device object-detection capability and turns the
//! detector's raw output into render-ready overlay rectangles. The detector
//! itself is an external opaque capability behind `DetectorBackend`; this
//! crate never looks inside it.
//!
//! # Module Structure
//!
//! - `geometry`: axis-aligned 2D primitives (`Rect`, `Size`)
//! - `overlay`: the overlay geometry mapper (orientation correction,
//!   fit/fill projection, edge clamping, styling)
//! - `detect`: detector capability boundary (backend trait, result types,
//!   stub backend)
//! - `service`: single-owner detector service with per-mode request routing
//!   and channel-based result delivery
//! - `video`: frame-addressable video sources for the stepped video path
//! - `config`: explicit configuration (file + env), replacing any implicit
//!   shared defaults
//! - `text`: deterministic label-text measurement

pub mod config;
pub mod detect;
pub mod geometry;
pub mod overlay;
pub mod service;
pub mod text;
pub mod video;

pub use config::{default_palette, DetectorSettings, FramesightConfig, Model, OverlayStyle, Rgba};
pub use detect::{
    Category, Detection, DetectionOutcome, DetectorBackend, Frame, ResultBundle, RunningMode,
    StubBackend,
};
pub use geometry::{Rect, Size};
pub use overlay::{
    clamp_to_viewport, correct_orientation, map_to_overlays, offsets_and_scale, ContentMode,
    ObjectOverlay, Orientation, Projection, SourceFrame, Viewport,
};
pub use service::{
    BackendFactory, DetectError, DetectorService, LiveStreamEvent, VideoProgress,
};
pub use text::TextMetrics;
pub use video::{OwnedFrame, SyntheticVideoSource, VideoSource};
