//! overlay_demo - end-to-end synthetic run of the detection overlay path
//!
//! Feeds synthetic live-stream frames through a `DetectorService` backed by
//! the stub detector, maps each outcome into viewport-space overlays, and
//! prints what a rendering surface would draw.

use anyhow::{anyhow, Result};
use clap::Parser;

use framesight::{
    map_to_overlays, ContentMode, DetectorBackend, DetectorService, Frame, FramesightConfig,
    Orientation, SourceFrame, Size, StubBackend, Viewport,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of synthetic frames to process.
    #[arg(long, default_value_t = 5)]
    frames: u32,
    /// Source frame width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Source frame height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 390.0)]
    viewport_width: f32,
    /// Viewport height in pixels.
    #[arg(long, default_value_t = 844.0)]
    viewport_height: f32,
    /// Content mode: fit or fill.
    #[arg(long, default_value = "fit")]
    mode: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.frames == 0 {
        return Err(anyhow!("frames must be >= 1"));
    }
    let content_mode = match args.mode.as_str() {
        "fit" => ContentMode::ScaleAspectFit,
        "fill" => ContentMode::ScaleAspectFill,
        other => return Err(anyhow!("unknown content mode '{}' (fit|fill)", other)),
    };

    let config = FramesightConfig::load()?;
    log::info!(
        "model {:?}, max results {}, score threshold {}",
        config.detector.model,
        config.detector.max_results,
        config.detector.score_threshold
    );

    let mut service = DetectorService::for_live_stream(
        config.detector.clone(),
        Box::new(|settings, _mode| {
            Ok(Box::new(StubBackend::new(settings.max_results)) as Box<dyn DetectorBackend>)
        }),
    );
    let events = service.subscribe_live_stream();

    let source = SourceFrame {
        size: Size::new(args.width as f32, args.height as f32),
        orientation: Orientation::Up,
    };
    let viewport = Viewport {
        size: Size::new(args.viewport_width, args.viewport_height),
        content_mode,
    };

    let frame_interval_ms: u32 = 1000 / 30;
    for index in 0..args.frames {
        let pixels = synthetic_pixels(args.width, args.height, index);
        let frame = Frame {
            pixels: &pixels,
            width: args.width,
            height: args.height,
        };
        service.detect_live_frame(frame, Orientation::Up, u64::from(index * frame_interval_ms))?;
    }
    drop(service);

    for event in events {
        match event.result {
            Ok(bundle) => {
                println!(
                    "frame @{}ms ({:.2}ms inference):",
                    event.timestamp_ms, bundle.inference_time_ms
                );
                for outcome in &bundle.outcomes {
                    let overlays =
                        map_to_overlays(&outcome.detections, source, viewport, &config.overlay);
                    for overlay in overlays {
                        println!(
                            "  [{:>3},{:>3},{:>3}] {:<22} x={:7.1} y={:7.1} w={:6.1} h={:6.1}",
                            overlay.color.r,
                            overlay.color.g,
                            overlay.color.b,
                            overlay.label,
                            overlay.rect.x,
                            overlay.rect.y,
                            overlay.rect.width,
                            overlay.rect.height,
                        );
                    }
                }
            }
            Err(err) => log::error!("frame @{}ms failed: {}", event.timestamp_ms, err),
        }
    }

    Ok(())
}

fn synthetic_pixels(width: u32, height: u32, frame_index: u32) -> Vec<u8> {
    let pixel_count = (width * height * 3) as usize;
    let mut pixels = vec![0u8; pixel_count];
    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = ((i as u64 + frame_index as u64 * 7) % 256) as u8;
    }
    pixels
}
