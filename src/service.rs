//! Detector ownership and request routing.
//!
//! `DetectorService` is the single owner of a detector backend: every
//! detection request goes through `&mut self`, so backend access needs no
//! locking and settings swaps cannot race an in-flight inference. Results
//! for the push-based live-stream path are delivered over a per-service
//! channel to exactly one listener.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use anyhow::Result;
use thiserror::Error;

use crate::config::DetectorSettings;
use crate::detect::{DetectorBackend, Frame, ResultBundle, RunningMode};
use crate::geometry::Size;
use crate::overlay::Orientation;
use crate::video::VideoSource;

/// Typed failures surfaced by `DetectorService`.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("service runs in {expected:?} mode, request was {actual:?}")]
    WrongMode {
        expected: RunningMode,
        actual: RunningMode,
    },
    #[error("backend construction failed: {0}")]
    BackendInit(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("frame decode failed: {0}")]
    Decode(String),
    #[error("inference interval must be positive, got {0}")]
    InvalidInterval(f64),
    #[error("no live-stream listener registered")]
    NoListener,
}

/// Builds a backend for the given settings and running mode.
pub type BackendFactory =
    Box<dyn Fn(&DetectorSettings, RunningMode) -> Result<Box<dyn DetectorBackend>> + Send>;

/// Delivered on the live-stream channel, one per submitted frame.
///
/// Failures ride the same channel as successes so the listener sees exactly
/// one completion per request.
#[derive(Debug)]
pub struct LiveStreamEvent {
    pub timestamp_ms: u64,
    pub orientation: Orientation,
    pub result: Result<ResultBundle, DetectError>,
}

/// Progress notifications for the video path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoProgress {
    Started { total_frames: usize },
    FrameDone { index: usize },
}

pub struct DetectorService {
    settings: DetectorSettings,
    running_mode: RunningMode,
    factory: BackendFactory,
    backend: Option<Box<dyn DetectorBackend>>,
    live_listener: Option<Sender<LiveStreamEvent>>,
    progress_listener: Option<Sender<VideoProgress>>,
}

impl DetectorService {
    fn new(settings: DetectorSettings, running_mode: RunningMode, factory: BackendFactory) -> Self {
        Self {
            settings,
            running_mode,
            factory,
            backend: None,
            live_listener: None,
            progress_listener: None,
        }
    }

    pub fn for_still_images(settings: DetectorSettings, factory: BackendFactory) -> Self {
        Self::new(settings, RunningMode::StillImage, factory)
    }

    pub fn for_video(settings: DetectorSettings, factory: BackendFactory) -> Self {
        Self::new(settings, RunningMode::Video, factory)
    }

    pub fn for_live_stream(settings: DetectorSettings, factory: BackendFactory) -> Self {
        Self::new(settings, RunningMode::LiveStream, factory)
    }

    pub fn running_mode(&self) -> RunningMode {
        self.running_mode
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Swap detector options. No-op when unchanged; otherwise the current
    /// backend is torn down and the next request rebuilds it lazily.
    pub fn update_settings(&mut self, settings: DetectorSettings) {
        if self.settings == settings {
            return;
        }
        log::info!("detector settings changed, backend will be rebuilt");
        self.settings = settings;
        self.backend = None;
    }

    /// Register the live-stream listener. Replaces any previous listener;
    /// events go to exactly one receiver.
    pub fn subscribe_live_stream(&mut self) -> Receiver<LiveStreamEvent> {
        let (tx, rx) = mpsc::channel();
        self.live_listener = Some(tx);
        rx
    }

    /// Register a video-progress listener.
    pub fn subscribe_video_progress(&mut self) -> Receiver<VideoProgress> {
        let (tx, rx) = mpsc::channel();
        self.progress_listener = Some(tx);
        rx
    }

    fn backend_for(&mut self, mode: RunningMode) -> Result<&mut dyn DetectorBackend, DetectError> {
        if self.running_mode != mode {
            return Err(DetectError::WrongMode {
                expected: self.running_mode,
                actual: mode,
            });
        }
        if self.backend.is_none() {
            let backend = (self.factory)(&self.settings, mode)
                .map_err(|err| DetectError::BackendInit(err.to_string()))?;
            self.backend = Some(backend);
        }
        self.backend
            .as_deref_mut()
            .ok_or_else(|| DetectError::BackendInit("backend unavailable".to_string()))
    }

    /// One-shot detection on a still image.
    pub fn detect_image(&mut self, frame: Frame<'_>) -> Result<ResultBundle, DetectError> {
        let frame_size = Size::new(frame.width as f32, frame.height as f32);
        let backend = self.backend_for(RunningMode::StillImage)?;

        let start = Instant::now();
        let outcome = backend
            .detect(frame, 0)
            .map_err(|err| DetectError::Inference(err.to_string()))?;
        let inference_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(ResultBundle {
            inference_time_ms,
            outcomes: vec![outcome],
            frame_size,
        })
    }

    /// Push one live-stream frame. The completion (success or failure) is
    /// delivered on the channel from `subscribe_live_stream`.
    pub fn detect_live_frame(
        &mut self,
        frame: Frame<'_>,
        orientation: Orientation,
        timestamp_ms: u64,
    ) -> Result<(), DetectError> {
        if self.live_listener.is_none() {
            return Err(DetectError::NoListener);
        }

        let frame_size = Size::new(frame.width as f32, frame.height as f32);
        let result = self.backend_for(RunningMode::LiveStream).and_then(|backend| {
            let start = Instant::now();
            backend
                .detect(frame, timestamp_ms)
                .map(|outcome| ResultBundle {
                    inference_time_ms: start.elapsed().as_secs_f64() * 1000.0,
                    outcomes: vec![outcome],
                    frame_size,
                })
                .map_err(|err| DetectError::Inference(err.to_string()))
        });

        let event = LiveStreamEvent {
            timestamp_ms,
            orientation,
            result,
        };
        match self.live_listener.as_ref() {
            Some(listener) if listener.send(event).is_ok() => Ok(()),
            _ => {
                // Receiver went away; drop the stale sender.
                self.live_listener = None;
                Err(DetectError::NoListener)
            }
        }
    }

    /// Step through a video at `interval_ms`, detecting on each stepped
    /// frame. Progress is reported through the channel from
    /// `subscribe_video_progress`, when one is registered.
    ///
    /// A frame that fails to decode aborts the run; a frame whose inference
    /// fails is logged and skipped.
    pub fn detect_video(
        &mut self,
        source: &mut dyn VideoSource,
        interval_ms: f64,
    ) -> Result<ResultBundle, DetectError> {
        if !interval_ms.is_finite() || interval_ms <= 0.0 {
            return Err(DetectError::InvalidInterval(interval_ms));
        }
        // Fail fast on mode mismatch before touching the source.
        self.backend_for(RunningMode::Video)?;

        let total_frames = (source.duration_ms() / interval_ms) as usize;
        self.notify_progress(VideoProgress::Started { total_frames });

        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(total_frames);
        let mut frame_size = Size::default();

        for index in 0..total_frames {
            let timestamp_ms = interval_ms as u64 * index as u64;
            let frame = source
                .frame_at(timestamp_ms)
                .map_err(|err| DetectError::Decode(err.to_string()))?;
            frame_size = frame.size();

            let backend = self.backend_for(RunningMode::Video)?;
            match backend.detect(frame.as_frame(), timestamp_ms) {
                Ok(outcome) => {
                    outcomes.push(outcome);
                    self.notify_progress(VideoProgress::FrameDone { index });
                }
                Err(err) => {
                    log::warn!("inference failed on frame {}: {}", index, err);
                }
            }
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let inference_time_ms = if total_frames == 0 {
            0.0
        } else {
            elapsed_ms / total_frames as f64
        };

        Ok(ResultBundle {
            inference_time_ms,
            outcomes,
            frame_size,
        })
    }

    fn notify_progress(&mut self, progress: VideoProgress) {
        if let Some(listener) = self.progress_listener.as_ref() {
            if listener.send(progress).is_err() {
                self.progress_listener = None;
            }
        }
    }
}
