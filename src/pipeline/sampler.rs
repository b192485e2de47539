//! Fixed-stride frame sampling with a source-time cutoff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::{frame_skip, PipelineConfig};
use crate::composite::{composite, Background};
use crate::pixels::PixelGrid;
use crate::source::{FrameSource, SourceError};

/// A frame chosen for conversion, already composited to intensities.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Position of the frame in the source stream.
    pub source_frame: u64,
    /// `source_frame / native_fps`, in seconds.
    pub timestamp: f64,
    pub pixels: PixelGrid,
}

/// Walks a source once, yielding every `frame_skip`-th frame until the
/// source ends, the cutoff passes, or the stop flag is raised.
pub struct Sampler<S> {
    source: S,
    native_fps: f64,
    frame_skip: u64,
    cutoff: Option<f64>,
    background: Background,
    stop: Option<Arc<AtomicBool>>,
    counter: u64,
    done: bool,
}

impl<S: FrameSource> Sampler<S> {
    /// Fails when the source reports a frame rate that is not a positive,
    /// finite number.
    pub fn new(
        source: S,
        config: &PipelineConfig,
        stop: Option<Arc<AtomicBool>>,
    ) -> Result<Self, SourceError> {
        let native_fps = source.native_fps();
        if !native_fps.is_finite() || native_fps <= 0.0 {
            return Err(SourceError::InvalidFrameRate(native_fps));
        }
        let frame_skip = frame_skip(native_fps, config.target_fps());
        log::debug!(
            "{}: sampling every {} frame(s) ({:.3} fps -> {} fps)",
            source.name(),
            frame_skip,
            native_fps,
            config.target_fps()
        );

        Ok(Self {
            source,
            native_fps,
            frame_skip,
            cutoff: config.cutoff(),
            background: config.background(),
            stop,
            counter: 0,
            done: false,
        })
    }

    pub fn frame_skip(&self) -> u64 {
        self.frame_skip
    }

    pub fn native_fps(&self) -> f64 {
        self.native_fps
    }

    /// Number of source frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.counter
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn past_cutoff(&self, counter: u64) -> bool {
        match self.cutoff {
            Some(limit) => counter as f64 / self.native_fps > limit,
            None => false,
        }
    }
}

impl<S: FrameSource> Iterator for Sampler<S> {
    type Item = Result<SampledFrame, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.stop_requested() {
                log::info!("stop requested after {} source frames", self.counter);
                self.done = true;
                break;
            }
            // Checked before reading so no frame past the cutoff is decoded
            if self.past_cutoff(self.counter) {
                log::debug!("duration cutoff reached at source frame {}", self.counter);
                self.done = true;
                break;
            }

            let frame = match self.source.next() {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            };

            let source_frame = self.counter;
            self.counter += 1;
            if source_frame % self.frame_skip != 0 {
                continue;
            }

            return Some(Ok(SampledFrame {
                source_frame,
                timestamp: source_frame as f64 / self.native_fps,
                pixels: composite(&frame, self.background),
            }));
        }
        None
    }
}
