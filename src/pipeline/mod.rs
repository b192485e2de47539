//! Frame pipeline: sample a source, composite, resize and quantize.
//!
//! The scan is a single sequential pass. [`FramePipeline::run_pipelined`]
//! moves decoding onto a producer thread behind a bounded channel; output
//! order is the same either way.

mod config;
mod sampler;

use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

pub use config::{frame_skip, PipelineConfig};
pub use sampler::{SampledFrame, Sampler};

use crate::braille::{fit_to_canvas, quantize, GlyphGrid, QuantizerConfig};
use crate::composite::{composite, Background};
use crate::error::ConfigError;
use crate::pixels::PixelGrid;
use crate::source::{FrameSource, SourceError};

/// One converted frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Running count of emitted samples, starting at 0.
    pub index: usize,
    /// Position of the frame in the source stream.
    pub source_frame: u64,
    /// Source time of the frame in seconds.
    pub source_timestamp: f64,
    pub glyph_text: String,
}

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Resize an intensity grid onto the braille canvas and quantize it.
pub fn render_pixels(pixels: &PixelGrid, quantizer: &QuantizerConfig) -> GlyphGrid {
    let resized = fit_to_canvas(pixels, quantizer.target_width());
    quantize(&resized, quantizer)
}

/// Convert a single decoded image.
pub fn convert_image(
    image: &DynamicImage,
    quantizer: &QuantizerConfig,
    background: Background,
) -> GlyphGrid {
    render_pixels(&composite(image, background), quantizer)
}

/// Drives frame sources through the quantizer.
#[derive(Debug, Clone)]
pub struct FramePipeline {
    config: PipelineConfig,
    stop: Option<Arc<AtomicBool>>,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, stop: None }
    }

    /// End the scan early once `flag` is set; samples produced so far are kept.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn to_sample(&self, index: usize, frame: SampledFrame) -> FrameSample {
        let glyphs = render_pixels(&frame.pixels, self.config.quantizer());
        log::debug!(
            "sample {} <- source frame {} ({:.3}s)",
            index,
            frame.source_frame,
            frame.timestamp
        );
        FrameSample {
            index,
            source_frame: frame.source_frame,
            source_timestamp: frame.timestamp,
            glyph_text: glyphs.to_text(),
        }
    }

    /// Sample and convert `source` on the calling thread.
    ///
    /// An empty result (short source, immediate cutoff) is not an error.
    pub fn run<S: FrameSource>(&self, source: S) -> Result<Vec<FrameSample>, PipelineError> {
        let mut sampler = Sampler::new(source, &self.config, self.stop.clone())?;
        let mut samples = Vec::new();

        for frame in sampler.by_ref() {
            let sample = self.to_sample(samples.len(), frame?);
            samples.push(sample);
        }

        log::info!(
            "converted {} of {} source frames",
            samples.len(),
            sampler.frames_read()
        );
        Ok(samples)
    }

    /// Like [`run`](Self::run), but decoding and compositing happen on a
    /// producer thread that stays at most `capacity` frames ahead.
    pub fn run_pipelined<S>(
        &self,
        source: S,
        capacity: usize,
    ) -> Result<Vec<FrameSample>, PipelineError>
    where
        S: FrameSource + Send + 'static,
    {
        let sampler = Sampler::new(source, &self.config, self.stop.clone())?;
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));

        let producer = thread::spawn(move || {
            for frame in sampler {
                let failed = frame.is_err();
                // Receiver gone means the consumer bailed out
                if tx.send(frame).is_err() || failed {
                    break;
                }
            }
        });

        let mut samples = Vec::new();
        let mut result = Ok(());
        for frame in rx.iter() {
            match frame {
                Ok(frame) => {
                    let sample = self.to_sample(samples.len(), frame);
                    samples.push(sample);
                }
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        drop(rx);

        if let Err(panic) = producer.join() {
            std::panic::resume_unwind(panic);
        }
        result?;

        log::info!("converted {} frames (pipelined)", samples.len());
        Ok(samples)
    }
}
