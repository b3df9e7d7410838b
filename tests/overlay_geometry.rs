use approx::assert_relative_eq;

use framesight::{
    clamp_to_viewport, correct_orientation, map_to_overlays, offsets_and_scale, Category,
    ContentMode, Detection, Orientation, OverlayStyle, Rect, Rgba, Size, SourceFrame, Viewport,
};

fn detection(rect: Rect, name: &str, score: f32) -> Detection {
    Detection {
        bounding_box: rect,
        categories: vec![Category::new(name, score)],
    }
}

fn fit_viewport(width: f32, height: f32) -> Viewport {
    Viewport {
        size: Size::new(width, height),
        content_mode: ContentMode::ScaleAspectFit,
    }
}

#[test]
fn identity_projection_passes_rects_through() {
    let source = SourceFrame {
        size: Size::new(640.0, 480.0),
        orientation: Orientation::Up,
    };
    let viewport = fit_viewport(640.0, 480.0);
    let style = OverlayStyle::default();

    let rects = [
        Rect::new(100.0, 100.0, 50.0, 50.0),
        Rect::new(10.0, 400.0, 200.0, 60.0),
        Rect::new(0.0, 0.0, 640.0, 480.0),
    ];
    for rect in rects {
        let overlays = map_to_overlays(&[detection(rect, "cat", 0.9)], source, viewport, &style);
        assert_eq!(overlays.len(), 1);
        assert_relative_eq!(overlays[0].rect.x, rect.x);
        assert_relative_eq!(overlays[0].rect.y, rect.y);
        assert_relative_eq!(overlays[0].rect.width, rect.width);
        assert_relative_eq!(overlays[0].rect.height, rect.height);
    }
}

#[test]
fn rotation_correction_round_trips() {
    let image = Size::new(640.0, 480.0);
    let rect = Rect::new(100.0, 50.0, 120.0, 80.0);

    let left = correct_orientation(rect, image, Orientation::RotatedLeft);
    // The left-corrected box lives in the upright image, whose dimensions
    // are the sensor's swapped.
    let upright = Size::new(image.height, image.width);
    let restored = correct_orientation(left, upright, Orientation::RotatedRight);

    assert_relative_eq!(restored.x, rect.x);
    assert_relative_eq!(restored.y, rect.y);
    assert_relative_eq!(restored.width, rect.width);
    assert_relative_eq!(restored.height, rect.height);
}

#[test]
fn rotated_left_matches_formula() {
    let image = Size::new(640.0, 480.0);
    let rect = Rect::new(100.0, 50.0, 120.0, 80.0);
    let corrected = correct_orientation(rect, image, Orientation::RotatedLeft);
    assert_eq!(corrected, Rect::new(50.0, 480.0 - 100.0 - 120.0, 80.0, 120.0));
}

#[test]
fn rotated_right_matches_formula() {
    let image = Size::new(640.0, 480.0);
    let rect = Rect::new(100.0, 50.0, 120.0, 80.0);
    let corrected = correct_orientation(rect, image, Orientation::RotatedRight);
    assert_eq!(corrected, Rect::new(640.0 - 50.0 - 80.0, 100.0, 80.0, 120.0));
}

#[test]
fn fit_stays_inside_viewport_on_constrained_axis() {
    let image = Size::new(1000.0, 500.0);
    let view = Size::new(500.0, 500.0);
    let projection = offsets_and_scale(image, view, ContentMode::ScaleAspectFit);

    // The whole source image projects inside the viewport.
    let full = Rect::new(0.0, 0.0, image.width, image.height)
        .scaled_by(projection.scale, projection.scale)
        .translated_by(projection.x_offset, projection.y_offset);
    assert!(full.x >= 0.0);
    assert!(full.y >= 0.0);
    assert!(full.max_x() <= view.width);
    assert!(full.max_y() <= view.height);
}

#[test]
fn fill_covers_viewport_on_both_axes() {
    let image = Size::new(1000.0, 500.0);
    let view = Size::new(500.0, 500.0);
    let projection = offsets_and_scale(image, view, ContentMode::ScaleAspectFill);

    assert!(image.width * projection.scale >= view.width);
    assert!(image.height * projection.scale >= view.height);
}

#[test]
fn worked_example_fit() {
    // Source 1000x500 upright into a 500x500 viewport under fit:
    // scale 0.5, offsets (0, 125).
    let source = SourceFrame {
        size: Size::new(1000.0, 500.0),
        orientation: Orientation::Up,
    };
    let viewport = fit_viewport(500.0, 500.0);
    let style = OverlayStyle::default();

    let overlays = map_to_overlays(
        &[detection(Rect::new(100.0, 100.0, 50.0, 50.0), "cat", 0.9)],
        source,
        viewport,
        &style,
    );
    assert_eq!(overlays.len(), 1);
    assert_relative_eq!(overlays[0].rect.x, 50.0);
    assert_relative_eq!(overlays[0].rect.y, 175.0);
    assert_relative_eq!(overlays[0].rect.width, 25.0);
    assert_relative_eq!(overlays[0].rect.height, 25.0);
}

#[test]
fn worked_example_fill_clamps_offscreen_box() {
    // Same source/viewport under fill: scale 1.0, offsets (-250, 0). The box
    // projects to x = -150 and is pinned to the edge margin with zero width.
    let source = SourceFrame {
        size: Size::new(1000.0, 500.0),
        orientation: Orientation::Up,
    };
    let viewport = Viewport {
        size: Size::new(500.0, 500.0),
        content_mode: ContentMode::ScaleAspectFill,
    };
    let style = OverlayStyle::default();

    let overlays = map_to_overlays(
        &[detection(Rect::new(100.0, 100.0, 50.0, 50.0), "cat", 0.9)],
        source,
        viewport,
        &style,
    );
    assert_eq!(overlays.len(), 1);
    assert_relative_eq!(overlays[0].rect.x, 2.0);
    assert_relative_eq!(overlays[0].rect.width, 0.0);
    assert_relative_eq!(overlays[0].rect.y, 100.0);
    assert_relative_eq!(overlays[0].rect.height, 50.0);
}

#[test]
fn clamp_never_inverts() {
    let view = Size::new(500.0, 500.0);
    let rects = [
        Rect::new(-600.0, -600.0, 100.0, 100.0),
        Rect::new(600.0, 600.0, 100.0, 100.0),
        Rect::new(-50.0, 490.0, 40.0, 40.0),
        Rect::new(499.0, 0.0, 1000.0, 1000.0),
    ];
    for rect in rects {
        let clamped = clamp_to_viewport(rect, view, 2.0);
        assert!(clamped.width >= 0.0, "width inverted for {:?}", rect);
        assert!(clamped.height >= 0.0, "height inverted for {:?}", rect);
    }
}

#[test]
fn colors_cycle_through_palette() {
    let source = SourceFrame {
        size: Size::new(640.0, 480.0),
        orientation: Orientation::Up,
    };
    let viewport = fit_viewport(640.0, 480.0);
    let style = OverlayStyle {
        palette: vec![
            Rgba::opaque(255, 0, 0),
            Rgba::opaque(0, 255, 0),
            Rgba::opaque(0, 0, 255),
        ],
        ..OverlayStyle::default()
    };

    let detections: Vec<Detection> = (0..7)
        .map(|i| detection(Rect::new(i as f32 * 10.0, 0.0, 8.0, 8.0), "cat", 0.9))
        .collect();
    let overlays = map_to_overlays(&detections, source, viewport, &style);

    assert_eq!(overlays.len(), 7);
    for (i, overlay) in overlays.iter().enumerate() {
        assert_eq!(overlay.color, style.palette[i % 3]);
    }
    assert_eq!(overlays[0].color, overlays[3].color);
    assert_eq!(overlays[1].color, overlays[4].color);
}

#[test]
fn unlabeled_detections_are_skipped_without_shifting_colors() {
    let source = SourceFrame {
        size: Size::new(640.0, 480.0),
        orientation: Orientation::Up,
    };
    let viewport = fit_viewport(640.0, 480.0);
    let style = OverlayStyle::default();

    let detections = vec![
        detection(Rect::new(0.0, 0.0, 10.0, 10.0), "cat", 0.9),
        Detection {
            bounding_box: Rect::new(20.0, 0.0, 10.0, 10.0),
            categories: vec![],
        },
        detection(Rect::new(40.0, 0.0, 10.0, 10.0), "dog", 0.8),
    ];
    let overlays = map_to_overlays(&detections, source, viewport, &style);

    assert_eq!(overlays.len(), 2);
    assert!(overlays[0].label.starts_with("cat"));
    assert!(overlays[1].label.starts_with("dog"));
    // Output-index coloring: the skipped detection does not consume a color.
    assert_eq!(overlays[0].color, style.palette[0]);
    assert_eq!(overlays[1].color, style.palette[1]);
}

#[test]
fn degenerate_sizes_yield_empty_output() {
    let style = OverlayStyle::default();
    let detections = vec![detection(Rect::new(0.0, 0.0, 10.0, 10.0), "cat", 0.9)];

    let zero_source = SourceFrame {
        size: Size::new(0.0, 480.0),
        orientation: Orientation::Up,
    };
    assert!(map_to_overlays(&detections, zero_source, fit_viewport(100.0, 100.0), &style).is_empty());

    let source = SourceFrame {
        size: Size::new(640.0, 480.0),
        orientation: Orientation::Up,
    };
    assert!(map_to_overlays(&detections, source, fit_viewport(0.0, 0.0), &style).is_empty());
}

#[test]
fn labels_carry_measured_sizes() {
    let source = SourceFrame {
        size: Size::new(640.0, 480.0),
        orientation: Orientation::Up,
    };
    let viewport = fit_viewport(640.0, 480.0);
    let style = OverlayStyle::default();

    let overlays = map_to_overlays(
        &[
            detection(Rect::new(0.0, 0.0, 10.0, 10.0), "cat", 0.9),
            detection(Rect::new(20.0, 0.0, 10.0, 10.0), "traffic light", 0.7),
        ],
        source,
        viewport,
        &style,
    );
    assert_eq!(overlays[0].label, "cat  (90%)");
    assert_eq!(overlays[1].label, "traffic light  (70%)");
    assert!(overlays[1].label_size.width > overlays[0].label_size.width);
    assert!(overlays[0].label_size.height > 0.0);
}

#[test]
fn rotated_live_frame_maps_into_portrait_viewport() {
    // A landscape sensor frame rotated left, drawn into a portrait viewport
    // under fill: the corrected box must land inside the upright image.
    let source = SourceFrame {
        size: Size::new(640.0, 480.0),
        orientation: Orientation::RotatedLeft,
    };
    let viewport = Viewport {
        size: Size::new(390.0, 844.0),
        content_mode: ContentMode::ScaleAspectFill,
    };
    let style = OverlayStyle::default();

    // Sensor-space box that corrects to (300, 200, 60, 60) in the upright
    // image, near the center of the visible region.
    let overlays = map_to_overlays(
        &[detection(Rect::new(220.0, 300.0, 60.0, 60.0), "person", 0.95)],
        source,
        viewport,
        &style,
    );
    assert_eq!(overlays.len(), 1);
    let rect = overlays[0].rect;
    assert!(rect.width > 0.0 && rect.height > 0.0);
    assert!(rect.x >= 0.0 && rect.y >= 0.0);
    assert!(rect.max_x() <= viewport.size.width);
    assert!(rect.max_y() <= viewport.size.height);
}
