//! Single-channel intensity buffers consumed by the quantizer.

use image::GrayImage;

/// A row-major buffer of 8-bit intensities (0 = black, 255 = white).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Errors raised when building a [`PixelGrid`] from raw samples.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelGridError {
    #[error("{width}x{height} grid needs {expected} samples, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl PixelGrid {
    /// Wrap raw samples, checking that `width * height` matches the sample count.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelGridError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(PixelGridError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A grid with every sample set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// A zero-area grid of the given width.
    pub fn empty(width: u32) -> Self {
        Self {
            width,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn from_gray(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    pub fn into_gray(self) -> Option<GrayImage> {
        GrayImage::from_raw(self.width, self.height, self.data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Sample at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Copy of this grid with every sample replaced by `255 - sample`.
    pub fn inverted(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| 255 - v).collect(),
        }
    }
}
