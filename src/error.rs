//! Error types shared across the conversion core.

/// Invalid conversion settings. Values are rejected, never clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("target width must be a positive number of columns")]
    ZeroWidth,

    #[error("threshold must be between 0 and 255, got {0}")]
    ThresholdOutOfRange(i64),

    #[error("target fps must be a positive integer")]
    ZeroFps,

    #[error("max duration must be a number of seconds, got {0}")]
    InvalidDuration(f64),
}
