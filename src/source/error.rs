//! Error types for frame sources.

use std::path::PathBuf;

/// Errors raised while opening or decoding a frame source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("FFmpeg not found. Install ffmpeg (with ffprobe) to convert videos")]
    FfmpegNotFound,

    #[error("failed to run {program}: {source}")]
    SpawnFailed {
        program: &'static str,
        source: std::io::Error,
    },

    #[error("ffprobe could not read '{}': {message}", path.display())]
    ProbeFailed { path: PathBuf, message: String },

    #[error("source reports an unusable frame rate ({0})")]
    InvalidFrameRate(f64),

    #[error("failed to read frame {index}: {source}")]
    ReadFailed {
        index: u64,
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn spawn(program: &'static str, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            SourceError::FfmpegNotFound
        } else {
            SourceError::SpawnFailed { program, source: e }
        }
    }
}
