//! Resampling of intensity buffers onto the braille canvas.

use image::imageops::{self, FilterType};

use super::dimensions::braille_canvas;
use crate::pixels::PixelGrid;

/// Filter used when shrinking or enlarging frames.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Resize `pixels` to `(target_width, character_rows * 4)`.
///
/// When the aspect ratio leaves no complete character row the resampler is
/// skipped and an empty grid comes back.
pub fn fit_to_canvas(pixels: &PixelGrid, target_width: u32) -> PixelGrid {
    let (width, height) = braille_canvas(pixels.width(), pixels.height(), target_width);
    if width == 0 || height == 0 {
        return PixelGrid::empty(width);
    }
    if (width, height) == (pixels.width(), pixels.height()) {
        return pixels.clone();
    }

    match pixels.clone().into_gray() {
        Some(gray) => PixelGrid::from_gray(imageops::resize(&gray, width, height, RESIZE_FILTER)),
        None => PixelGrid::empty(width),
    }
}
