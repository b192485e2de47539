//! braille-art library crate.
//!
//! Turns raster images and video frames into Unicode braille text, one
//! character per 2x4 block of pixels.
//!
//! ```no_run
//! use braille_art::braille::QuantizerConfig;
//! use braille_art::composite::Background;
//! use braille_art::pipeline::convert_image;
//!
//! let image = image::open("photo.png").unwrap();
//! let config = QuantizerConfig::new(80, 128, false).unwrap();
//! println!("{}", convert_image(&image, &config, Background::White));
//! ```

pub mod braille;
pub mod cli;
pub mod composite;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pixels;
pub mod source;

pub use braille::{quantize, BrailleCell, GlyphGrid, QuantizerConfig};
pub use composite::{composite, AlphaMode, Background};
pub use error::ConfigError;
pub use pipeline::{convert_image, FramePipeline, FrameSample, PipelineConfig, PipelineError};
pub use pixels::PixelGrid;
pub use source::{FrameSource, SourceError};
