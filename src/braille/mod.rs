//! Braille raster quantizer.
//!
//! Converts intensity buffers into grids of Unicode braille glyphs:
//!
//! 1. **Geometry** - derive character rows from the source aspect ratio
//! 2. **Resizing** - resample onto a `(width, rows * 4)` canvas
//! 3. **Quantization** - threshold each 2x4 block into one glyph

mod cell;
mod dimensions;
mod quantize;
mod resize;

pub use cell::{BrailleCell, BRAILLE_BASE, DOT_BITS};
pub use dimensions::{braille_canvas, character_rows, CELL_ASPECT_CORRECTION};
pub use quantize::{quantize, GlyphGrid, QuantizerConfig};
pub use resize::{fit_to_canvas, RESIZE_FILTER};
