//! Frame sources feeding the pipeline.
//!
//! Decoding is delegated to external collaborators:
//! - Still images and animated GIFs via the `image` crate
//! - Everything else via an `ffmpeg` child process ([`FfmpegSource`])
//! - Pre-decoded frames via [`MemorySource`]

mod error;
mod ffmpeg;
mod gif;
mod memory;
mod still;

use std::path::Path;

use image::{DynamicImage, ImageFormat};

pub use error::SourceError;
pub use ffmpeg::{
    decode_command, parse_frame_rate, parse_probe_output, probe, FfmpegSource, VideoInfo,
};
pub use gif::{fps_from_delay, GifSource, DEFAULT_GIF_FPS};
pub use memory::MemorySource;
pub use still::StillImage;

/// An ordered stream of decoded frames with a native frame rate.
pub trait FrameSource: Iterator<Item = Result<DynamicImage, SourceError>> {
    /// Frames per second of the underlying stream.
    fn native_fps(&self) -> f64;

    /// Human-readable name, usually the file name.
    fn name(&self) -> &str;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn native_fps(&self) -> f64 {
        (**self).native_fps()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// How a path will be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Still,
    Gif,
    Video,
}

impl SourceKind {
    /// Pick a decoder from the file extension.
    pub fn detect(path: &Path) -> Self {
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Gif) => SourceKind::Gif,
            Ok(_) => SourceKind::Still,
            Err(_) => SourceKind::Video,
        }
    }
}

/// Open `path` with the decoder matching its extension.
pub fn open(path: &Path) -> Result<Box<dyn FrameSource + Send>, SourceError> {
    let source: Box<dyn FrameSource + Send> = match SourceKind::detect(path) {
        SourceKind::Still => Box::new(StillImage::open(path)?),
        SourceKind::Gif => Box::new(GifSource::open(path)?),
        SourceKind::Video => Box::new(FfmpegSource::open(path)?),
    };
    Ok(source)
}

pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
