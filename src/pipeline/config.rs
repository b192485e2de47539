//! Sampling configuration for the frame pipeline.

use crate::braille::QuantizerConfig;
use crate::composite::Background;
use crate::error::ConfigError;

/// Everything the pipeline needs besides the source itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    quantizer: QuantizerConfig,
    background: Background,
    target_fps: u32,
    max_duration: f64,
}

impl PipelineConfig {
    /// Validate and build a pipeline config.
    ///
    /// `max_duration` is in seconds of source time; zero or negative means
    /// the whole source is scanned.
    pub fn new(
        quantizer: QuantizerConfig,
        background: Background,
        target_fps: u32,
        max_duration: f64,
    ) -> Result<Self, ConfigError> {
        if target_fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if max_duration.is_nan() {
            return Err(ConfigError::InvalidDuration(max_duration));
        }
        Ok(Self {
            quantizer,
            background,
            target_fps,
            max_duration,
        })
    }

    pub fn quantizer(&self) -> &QuantizerConfig {
        &self.quantizer
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    /// Source-time cutoff in seconds, if any.
    pub fn cutoff(&self) -> Option<f64> {
        (self.max_duration > 0.0).then_some(self.max_duration)
    }
}

/// Fixed sampling stride: `max(1, floor(native_fps / target_fps))`.
///
/// This is not a time-accurate resampler; the effective rate drifts from
/// `target_fps` when `native_fps` is not an integer multiple of it.
pub fn frame_skip(native_fps: f64, target_fps: u32) -> u64 {
    if target_fps == 0 || !native_fps.is_finite() {
        return 1;
    }
    ((native_fps / target_fps as f64).floor() as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantizer() -> QuantizerConfig {
        QuantizerConfig::new(60, 150, true).unwrap()
    }

    #[test]
    fn test_frame_skip() {
        assert_eq!(frame_skip(30.0, 10), 3);
        assert_eq!(frame_skip(30.0, 5), 6);
        assert_eq!(frame_skip(29.97, 10), 2);
        assert_eq!(frame_skip(24.0, 30), 1);
        assert_eq!(frame_skip(30.0, 30), 1);
    }

    #[test]
    fn test_rejects_zero_fps() {
        assert_eq!(
            PipelineConfig::new(quantizer(), Background::White, 0, 10.0),
            Err(ConfigError::ZeroFps)
        );
    }

    #[test]
    fn test_rejects_nan_duration() {
        assert!(matches!(
            PipelineConfig::new(quantizer(), Background::White, 5, f64::NAN),
            Err(ConfigError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_cutoff() {
        let bounded = PipelineConfig::new(quantizer(), Background::White, 5, 10.0).unwrap();
        assert_eq!(bounded.cutoff(), Some(10.0));
        let zero = PipelineConfig::new(quantizer(), Background::White, 5, 0.0).unwrap();
        assert_eq!(zero.cutoff(), None);
        let negative = PipelineConfig::new(quantizer(), Background::White, 5, -3.0).unwrap();
        assert_eq!(negative.cutoff(), None);
    }
}
