//! Background compositing and RGB to grayscale conversion.
//!
//! Transparent pixels are blended onto a solid background before the
//! ITU-R BT.601 luminance formula reduces them to one channel.

use clap::ValueEnum;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::pixels::PixelGrid;

/// Background color for sources with an alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    White,
    Black,
    /// Ignore alpha and convert the color channels as-is.
    None,
}

impl Background {
    /// Intensity of the solid background, or `None` for passthrough.
    pub fn intensity(self) -> Option<u8> {
        match self {
            Background::White => Some(255),
            Background::Black => Some(0),
            Background::None => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Background::White => "white",
            Background::Black => "black",
            Background::None => "none",
        }
    }
}

/// How a decoded image is turned into intensities, decided once per image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Color channels convert directly.
    Opaque,
    /// Pixels are blended onto a background of the given intensity first.
    AlphaComposited(u8),
}

impl AlphaMode {
    pub fn resolve(image: &DynamicImage, background: Background) -> Self {
        match background.intensity() {
            Some(bg) if image.color().has_alpha() => AlphaMode::AlphaComposited(bg),
            _ => AlphaMode::Opaque,
        }
    }
}

/// ITU-R BT.601 luminance with integer math.
///
/// Coefficients scaled by 1000: 299 + 587 + 114 = 1000
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Blend one channel value with opacity `alpha` over `background`.
#[inline]
pub fn blend(value: u8, alpha: u8, background: u8) -> u8 {
    let a = alpha as u32;
    ((value as u32 * a + background as u32 * (255 - a) + 127) / 255) as u8
}

/// Convert packed RGB triplets to grayscale.
pub fn to_grayscale(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .map(|px| luminance(px[0], px[1], px[2]))
        .collect()
}

/// Composite `image` onto `background` and reduce it to a [`PixelGrid`].
///
/// Opaque images ignore the background choice, so compositing them is
/// idempotent across all three settings.
///
/// # Arguments
/// * `image` - Decoded frame in any pixel format
/// * `background` - Color transparent pixels are blended onto, or `None` to drop alpha
///
/// # Returns
/// A [`PixelGrid`] of BT.601 intensities with the image's dimensions.
pub fn composite(image: &DynamicImage, background: Background) -> PixelGrid {
    let (width, height) = (image.width(), image.height());

    let data = match AlphaMode::resolve(image, background) {
        AlphaMode::Opaque => match image {
            DynamicImage::ImageLuma8(gray) => gray.as_raw().clone(),
            _ => to_grayscale(image.to_rgb8().as_raw()),
        },
        AlphaMode::AlphaComposited(bg) => image
            .to_rgba8()
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                luminance(blend(r, a, bg), blend(g, a, bg), blend(b, a, bg))
            })
            .collect(),
    };

    match PixelGrid::new(width, height, data) {
        Ok(grid) => grid,
        // Decoders always hand over width * height pixels
        Err(_) => PixelGrid::empty(width),
    }
}
