//! Overlay geometry mapper.
//!
//! Takes detector output (boxes in source-image pixel space, plus that
//! image's orientation and size) and a destination viewport, and produces
//! render-ready overlay rectangles in viewport space:
//!
//! 1. Rotate each box into upright-image coordinates.
//! 2. Derive the scale factor and centering offsets for the viewport's
//!    content mode.
//! 3. Project the box (scale, then translate).
//! 4. Clamp against the viewport edges so labels and borders stay on-canvas.
//! 5. Attach the display label, cycled color and measured label size.
//!
//! The whole pass is pure: no shared state, safe to call from any thread.

use crate::config::{OverlayStyle, Rgba};
use crate::detect::{Category, Detection};
use crate::geometry::{Rect, Size};
use crate::text::TextMetrics;

/// Source-image rotation relative to upright.
///
/// `RotatedLeft`/`RotatedRight` are quarter turns; other rotations are not
/// modeled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Up,
    RotatedLeft,
    RotatedRight,
}

/// Aspect-preserving scaling policy for fitting content into a viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentMode {
    /// Scale to fit entirely inside the viewport, centered.
    #[default]
    ScaleAspectFit,
    /// Scale to cover the viewport entirely, centered, cropping overflow.
    ScaleAspectFill,
}

/// The image the detector ran on: sensor-native pixel size plus its
/// orientation relative to upright.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceFrame {
    pub size: Size,
    pub orientation: Orientation,
}

/// Destination drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub content_mode: ContentMode,
}

/// Scale factor and centering offsets mapping image space into view space.
///
/// Offsets may be negative under fill, meaning content extends past the
/// viewport on that axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub x_offset: f32,
    pub y_offset: f32,
    pub scale: f32,
}

/// One render-ready overlay: everything a drawing surface needs to put a
/// box, border and label on screen. This crate performs no drawing itself.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectOverlay {
    pub label: String,
    pub rect: Rect,
    pub color: Rgba,
    pub label_size: Size,
}

/// Derive the scale factor and centering offsets for drawing an image of
/// `image` size inside a view of `view` size under `mode`.
pub fn offsets_and_scale(image: Size, view: Size, mode: ContentMode) -> Projection {
    let width_scale = view.width / image.width;
    let height_scale = view.height / image.height;

    let scale = match mode {
        ContentMode::ScaleAspectFill => width_scale.max(height_scale),
        ContentMode::ScaleAspectFit => width_scale.min(height_scale),
    };

    let scaled = Size::new(image.width * scale, image.height * scale);
    Projection {
        x_offset: (view.width - scaled.width) / 2.0,
        y_offset: (view.height - scaled.height) / 2.0,
        scale,
    }
}

/// Rotate a bounding box from sensor orientation into upright-image
/// coordinates. `image` is the sensor-native (pre-rotation) size of the
/// frame the box was detected in.
pub fn correct_orientation(rect: Rect, image: Size, orientation: Orientation) -> Rect {
    match orientation {
        Orientation::Up => rect,
        Orientation::RotatedLeft => Rect::new(
            rect.y,
            image.height - rect.x - rect.width,
            rect.height,
            rect.width,
        ),
        Orientation::RotatedRight => Rect::new(
            image.width - rect.y - rect.height,
            rect.x,
            rect.height,
            rect.width,
        ),
    }
}

/// Clamp a projected rectangle so it keeps at least `edge_offset` pixels of
/// margin inside the viewport.
///
/// A negative near edge is pinned to `edge_offset` with the size reduced by
/// the pinned amount; a far edge past the viewport pulls the size back to
/// `edge_offset` inside it. Sizes are floored at zero, so clamping never
/// inverts a rectangle.
pub fn clamp_to_viewport(rect: Rect, view: Size, edge_offset: f32) -> Rect {
    let mut clamped = rect;

    if clamped.x < 0.0 {
        clamped.width += clamped.x - edge_offset;
        clamped.x = edge_offset;
    }
    if clamped.y < 0.0 {
        clamped.height += clamped.y - edge_offset;
        clamped.y = edge_offset;
    }

    if clamped.max_y() > view.height {
        clamped.height = view.height - clamped.y - edge_offset;
    }
    if clamped.max_x() > view.width {
        clamped.width = view.width - clamped.x - edge_offset;
    }

    clamped.width = clamped.width.max(0.0);
    clamped.height = clamped.height.max(0.0);
    clamped
}

/// Map detections into render-ready overlays, in input order.
///
/// Detections without any category are skipped. A degenerate source or
/// viewport size yields an empty result. Colors cycle through the style's
/// palette by output index.
pub fn map_to_overlays(
    detections: &[Detection],
    source: SourceFrame,
    viewport: Viewport,
    style: &OverlayStyle,
) -> Vec<ObjectOverlay> {
    if source.size.is_degenerate() || viewport.size.is_degenerate() {
        return Vec::new();
    }

    let projection = offsets_and_scale(source.size, viewport.size, viewport.content_mode);
    let metrics = TextMetrics::new(style.font_size);

    let mut overlays = Vec::with_capacity(detections.len());
    for detection in detections {
        let Some(category) = detection.top_category() else {
            continue;
        };

        let upright = correct_orientation(detection.bounding_box, source.size, source.orientation);
        let projected = upright
            .scaled_by(projection.scale, projection.scale)
            .translated_by(projection.x_offset, projection.y_offset);
        let rect = clamp_to_viewport(projected, viewport.size, style.edge_offset);

        let label = format_label(category);
        let label_size = metrics.measure(&label);
        let color = style.palette[overlays.len() % style.palette.len()];

        overlays.push(ObjectOverlay {
            label,
            rect,
            color,
            label_size,
        });
    }
    overlays
}

fn format_label(category: &Category) -> String {
    let percent = (category.score * 100.0).round() as i32;
    let name = category.name.as_deref().unwrap_or("Unknown");
    format!("{}  ({}%)", name, percent)
}
