//! Threshold quantization of intensity buffers into braille glyphs.
//!
//! Each braille character covers a 2x4 block of the (already resized)
//! buffer, giving 8 subpixels per output cell.

use std::fmt;

use super::cell::BrailleCell;
use crate::error::ConfigError;
use crate::pixels::PixelGrid;

/// Geometry and threshold settings for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizerConfig {
    target_width: u32,
    threshold: u8,
    invert: bool,
}

impl QuantizerConfig {
    /// Validate and build a config.
    ///
    /// `target_width` is the width of the resized buffer and must be positive.
    /// `threshold` must lie in `0..=255`.
    pub fn new(target_width: u32, threshold: i64, invert: bool) -> Result<Self, ConfigError> {
        if target_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        let threshold =
            u8::try_from(threshold).map_err(|_| ConfigError::ThresholdOutOfRange(threshold))?;
        Ok(Self {
            target_width,
            threshold,
            invert,
        })
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Whether a sample sets its dot: invert first, then compare.
    #[inline]
    pub fn is_on(&self, intensity: u8) -> bool {
        let intensity = if self.invert { 255 - intensity } else { intensity };
        intensity < self.threshold
    }
}

/// Rows of braille cells produced for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphGrid {
    rows: Vec<Vec<BrailleCell>>,
}

impl GlyphGrid {
    pub fn from_rows(rows: Vec<Vec<BrailleCell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<BrailleCell>] {
        &self.rows
    }

    /// Number of cells per row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of character rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = BrailleCell> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Rows joined by `\n`, without a trailing line break.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GlyphGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}

/// Quantize a resized intensity buffer into braille glyphs.
///
/// Walks the buffer at a vertical stride of 4 and a horizontal stride of 2.
/// Blocks clipped by the bottom or right edge leave the missing dots unset,
/// so the output always has `ceil(h / 4)` rows of `ceil(w / 2)` cells.
/// A zero-area buffer yields an empty grid.
///
/// # Arguments
/// * `pixels` - Intensity buffer already resized to the braille canvas
/// * `config` - Quantizer settings
///
/// # Returns
/// A [`GlyphGrid`] with one row per 4 pixel rows and one cell per 2 pixel columns.
pub fn quantize(pixels: &PixelGrid, config: &QuantizerConfig) -> GlyphGrid {
    let width = pixels.width();
    let height = pixels.height();
    if width == 0 || height == 0 {
        return GlyphGrid::default();
    }

    let columns = width.div_ceil(2) as usize;
    let mut rows = Vec::with_capacity(height.div_ceil(4) as usize);

    for by in (0..height).step_by(4) {
        let mut row = Vec::with_capacity(columns);
        for bx in (0..width).step_by(2) {
            let mut grid = [[false; 4]; 2];
            for (dx, column) in grid.iter_mut().enumerate() {
                for (dy, dot) in column.iter_mut().enumerate() {
                    if let Some(v) = pixels.get(bx + dx as u32, by + dy as u32) {
                        *dot = config.is_on(v);
                    }
                }
            }
            row.push(BrailleCell::from_dots(grid));
        }
        rows.push(row);
    }

    GlyphGrid { rows }
}
