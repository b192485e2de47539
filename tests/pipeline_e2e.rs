//! End-to-end tests for the frame pipeline.
//!
//! These tests drive in-memory and on-disk sources through sampling,
//! compositing, resizing and quantization.

use braille_art::braille::QuantizerConfig;
use braille_art::composite::Background;
use braille_art::pipeline::{convert_image, frame_skip, FramePipeline, PipelineConfig};
use braille_art::source::{self, FrameSource, MemorySource, SourceKind};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn pipeline(target_fps: u32, max_duration: f64) -> FramePipeline {
    let quantizer = QuantizerConfig::new(8, 128, false).unwrap();
    let config = PipelineConfig::new(quantizer, Background::White, target_fps, max_duration)
        .expect("valid pipeline config");
    FramePipeline::new(config)
}

fn black_frames(n: usize) -> Vec<DynamicImage> {
    vec![DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([0]))); n]
}

// ==================== Sampling ====================

#[test]
fn test_thirty_to_ten_fps_samples_three_of_nine() {
    assert_eq!(frame_skip(30.0, 10), 3);
    let samples = pipeline(10, 0.0)
        .run(MemorySource::new("clip", 30.0, black_frames(9)))
        .unwrap();
    let picked: Vec<u64> = samples.iter().map(|s| s.source_frame).collect();
    assert_eq!(picked, vec![0, 3, 6]);
    assert_eq!(samples.len(), 3);
}

#[test]
fn test_target_above_native_keeps_every_frame() {
    let samples = pipeline(60, 0.0)
        .run(MemorySource::new("clip", 24.0, black_frames(5)))
        .unwrap();
    assert_eq!(samples.len(), 5);
}

#[test]
fn test_source_shorter_than_stride() {
    // Only frame 0 is ever sampled
    let samples = pipeline(1, 0.0)
        .run(MemorySource::new("clip", 30.0, black_frames(10)))
        .unwrap();
    assert_eq!(samples.len(), 1);
}

// ==================== Duration Cutoff ====================

#[test]
fn test_zero_duration_never_truncates() {
    let samples = pipeline(30, 0.0)
        .run(MemorySource::new("clip", 30.0, black_frames(400)))
        .unwrap();
    assert_eq!(samples.len(), 400);
}

#[test]
fn test_duration_bounds_timestamps() {
    let samples = pipeline(10, 2.0)
        .run(MemorySource::new("clip", 30.0, black_frames(300)))
        .unwrap();
    assert!(!samples.is_empty());
    assert!(samples.iter().all(|s| s.source_timestamp <= 2.0));
    // Frames 0..=60 are within 2s, every third one is sampled
    assert_eq!(samples.len(), 21);
    assert_eq!(samples.last().unwrap().source_frame, 60);
}

#[test]
fn test_tiny_duration_still_samples_first_frame() {
    let samples = pipeline(10, 0.001)
        .run(MemorySource::new("clip", 30.0, black_frames(30)))
        .unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].source_timestamp, 0.0);
}

// ==================== Stop Flag ====================

#[test]
fn test_stop_flag_returns_partial_results() {
    let stop = Arc::new(AtomicBool::new(false));
    let pipeline = pipeline(30, 0.0).with_stop_flag(stop.clone());
    stop.store(true, Ordering::SeqCst);
    let samples = pipeline
        .run(MemorySource::new("clip", 30.0, black_frames(10)))
        .unwrap();
    assert!(samples.is_empty());
}

// ==================== Compositing ====================

#[test]
fn test_transparent_frames_follow_background() {
    let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
    let quantizer = QuantizerConfig::new(8, 128, false).unwrap();

    let on_white = convert_image(&transparent, &quantizer, Background::White);
    assert!(on_white.cells().all(|c| c.mask() == 0));

    let on_black = convert_image(&transparent, &quantizer, Background::Black);
    assert!(on_black.cells().all(|c| c.mask() == 0xFF));

    // Passthrough keeps the black color channels
    let passthrough = convert_image(&transparent, &quantizer, Background::None);
    assert_eq!(passthrough, on_black);
}

#[test]
fn test_aspect_ratio_sets_row_count() {
    let wide = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 50, Luma([0])));
    let quantizer = QuantizerConfig::new(40, 128, false).unwrap();
    let glyphs = convert_image(&wide, &quantizer, Background::White);
    // 40 * 0.25 * 0.5 = 5 rows, 20 cells each
    assert_eq!(glyphs.height(), 5);
    assert_eq!(glyphs.width(), 20);
}

// ==================== Files ====================

#[test]
fn test_open_png_as_still_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("square.png");
    GrayImage::from_pixel(16, 16, Luma([0])).save(&path).unwrap();

    assert_eq!(SourceKind::detect(&path), SourceKind::Still);
    let source = source::open(&path).unwrap();
    assert_eq!(source.name(), "square.png");
    assert_eq!(source.native_fps(), 1.0);

    let samples = pipeline(1, 0.0).run(source).unwrap();
    assert_eq!(samples.len(), 1);
    assert!(samples[0].glyph_text.contains('\u{28FF}'));
}

#[test]
fn test_open_missing_file_is_source_error() {
    let result = source::open(std::path::Path::new("/nonexistent/dir/pic.png"));
    assert!(result.is_err());
}

fn encode_gif(frames: usize, delay_ms: u32) -> Vec<u8> {
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame};

    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        for i in 0..frames {
            let image = RgbaImage::from_fn(16, 16, |x, y| {
                let v = ((x * 16 + y + i as u32 * 7) % 256) as u8;
                Rgba([v, v, v, 255])
            });
            let frame = Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
            encoder.encode_frame(frame).unwrap();
        }
    }
    bytes
}

#[test]
fn test_truncated_gif_yields_frames_before_cutoff() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.gif");
    let bytes = encode_gif(40, 100);
    std::fs::write(&path, &bytes[..bytes.len() * 9 / 10]).unwrap();

    let source = source::open(&path).unwrap();
    assert_eq!(source.native_fps(), 10.0);

    let samples = pipeline(10, 0.5).run(source).unwrap();
    let picked: Vec<u64> = samples.iter().map(|s| s.source_frame).collect();
    assert_eq!(picked, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_truncated_gif_pipelined_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.gif");
    let bytes = encode_gif(40, 100);
    std::fs::write(&path, &bytes[..bytes.len() * 9 / 10]).unwrap();

    let sequential = pipeline(10, 0.5).run(source::open(&path).unwrap()).unwrap();
    let pipelined = pipeline(10, 0.5)
        .run_pipelined(source::open(&path).unwrap(), 2)
        .unwrap();
    assert_eq!(sequential, pipelined);
}

#[test]
fn test_truncated_gif_without_cutoff_reports_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.gif");
    let bytes = encode_gif(40, 100);
    std::fs::write(&path, &bytes[..bytes.len() * 9 / 10]).unwrap();

    let result = pipeline(10, 0.0).run(source::open(&path).unwrap());
    assert!(result.is_err());
}
