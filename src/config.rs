use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_MAX_RESULTS: usize = 3;
const DEFAULT_SCORE_THRESHOLD: f32 = 0.2;
const DEFAULT_EDGE_OFFSET: f32 = 2.0;
const DEFAULT_FONT_SIZE: f32 = 14.0;

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    detector: Option<DetectorConfigFile>,
    overlay: Option<OverlayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    model: Option<String>,
    max_results: Option<usize>,
    score_threshold: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    edge_offset: Option<f32>,
    font_size: Option<f32>,
    palette: Option<Vec<[u8; 4]>>,
}

/// Bundled model choices.
///
/// The path is only transported to whatever constructs the detector backend;
/// this crate never opens the model file itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    EfficientDetLite0,
    EfficientDetLite2,
}

impl Model {
    pub fn model_path(&self) -> &'static str {
        match self {
            Model::EfficientDetLite0 => "models/efficientdet_lite0.tflite",
            Model::EfficientDetLite2 => "models/efficientdet_lite2.tflite",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "efficientdet-lite0" => Ok(Model::EfficientDetLite0),
            "efficientdet-lite2" => Ok(Model::EfficientDetLite2),
            other => Err(anyhow!(
                "unknown model '{}' (expected efficientdet-lite0 or efficientdet-lite2)",
                other
            )),
        }
    }
}

/// RGBA display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Overlay colors are cycled from this table by output index.
pub fn default_palette() -> Vec<Rgba> {
    vec![
        Rgba::opaque(255, 0, 0),
        Rgba::opaque(90, 200, 250),
        Rgba::opaque(0, 255, 0),
        Rgba::opaque(255, 127, 0),
        Rgba::opaque(0, 0, 255),
        Rgba::opaque(127, 0, 127),
        Rgba::opaque(255, 0, 255),
        Rgba::opaque(255, 255, 0),
        Rgba::opaque(0, 255, 255),
        Rgba::opaque(153, 102, 51),
    ]
}

/// Options handed to whatever constructs the detector backend.
///
/// `max_results` and `score_threshold` are enforced inside the backend, not
/// re-applied by this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSettings {
    pub model: Model,
    pub max_results: usize,
    pub score_threshold: f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            model: Model::EfficientDetLite0,
            max_results: DEFAULT_MAX_RESULTS,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

/// Styling inputs for the overlay mapper.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Minimum margin kept between an overlay rectangle and the viewport
    /// boundary, in pixels.
    pub edge_offset: f32,
    pub font_size: f32,
    pub palette: Vec<Rgba>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            edge_offset: DEFAULT_EDGE_OFFSET,
            font_size: DEFAULT_FONT_SIZE,
            palette: default_palette(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FramesightConfig {
    pub detector: DetectorSettings,
    pub overlay: OverlayStyle,
}

impl FramesightConfig {
    /// Load configuration from the file named by `FRAMESIGHT_CONFIG` (JSON,
    /// all fields optional), then apply env overrides, then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("FRAMESIGHT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ConfigFile) -> Result<Self> {
        let detector_file = file.detector.unwrap_or_default();
        let detector = DetectorSettings {
            model: detector_file
                .model
                .as_deref()
                .map(Model::parse)
                .transpose()?
                .unwrap_or(Model::EfficientDetLite0),
            max_results: detector_file.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            score_threshold: detector_file
                .score_threshold
                .unwrap_or(DEFAULT_SCORE_THRESHOLD),
        };

        let overlay_file = file.overlay.unwrap_or_default();
        let overlay = OverlayStyle {
            edge_offset: overlay_file.edge_offset.unwrap_or(DEFAULT_EDGE_OFFSET),
            font_size: overlay_file.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            palette: overlay_file
                .palette
                .map(|entries| {
                    entries
                        .into_iter()
                        .map(|[r, g, b, a]| Rgba::new(r, g, b, a))
                        .collect()
                })
                .unwrap_or_else(default_palette),
        };

        Ok(Self { detector, overlay })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(model) = std::env::var("FRAMESIGHT_MODEL") {
            if !model.trim().is_empty() {
                self.detector.model = Model::parse(model.trim())?;
            }
        }
        if let Ok(max_results) = std::env::var("FRAMESIGHT_MAX_RESULTS") {
            self.detector.max_results = max_results
                .parse()
                .map_err(|_| anyhow!("FRAMESIGHT_MAX_RESULTS must be an integer"))?;
        }
        if let Ok(threshold) = std::env::var("FRAMESIGHT_SCORE_THRESHOLD") {
            self.detector.score_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("FRAMESIGHT_SCORE_THRESHOLD must be a number"))?;
        }
        if let Ok(edge_offset) = std::env::var("FRAMESIGHT_EDGE_OFFSET") {
            self.overlay.edge_offset = edge_offset
                .parse()
                .map_err(|_| anyhow!("FRAMESIGHT_EDGE_OFFSET must be a number"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.detector.max_results == 0 {
            return Err(anyhow!("max_results must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.detector.score_threshold) {
            return Err(anyhow!("score_threshold must be within [0, 1]"));
        }
        if !self.overlay.edge_offset.is_finite() || self.overlay.edge_offset < 0.0 {
            return Err(anyhow!("edge_offset must be non-negative"));
        }
        if !self.overlay.font_size.is_finite() || self.overlay.font_size <= 0.0 {
            return Err(anyhow!("font_size must be positive"));
        }
        if self.overlay.palette.is_empty() {
            return Err(anyhow!("palette must contain at least one color"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
