//! Frames held in memory.

use std::collections::VecDeque;

use image::DynamicImage;

use super::{FrameSource, SourceError};

/// A source over frames that are already decoded, e.g. by an embedding
/// application with its own decoder.
pub struct MemorySource {
    name: String,
    fps: f64,
    frames: VecDeque<Result<DynamicImage, SourceError>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, fps: f64, frames: Vec<DynamicImage>) -> Self {
        Self::from_results(name, fps, frames.into_iter().map(Ok).collect())
    }

    /// Build a source that may fail part-way through.
    pub fn from_results(
        name: impl Into<String>,
        fps: f64,
        frames: Vec<Result<DynamicImage, SourceError>>,
    ) -> Self {
        Self {
            name: name.into(),
            fps,
            frames: frames.into(),
        }
    }

    /// Frames not yet handed out.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Iterator for MemorySource {
    type Item = Result<DynamicImage, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frames.pop_front()
    }
}

impl FrameSource for MemorySource {
    fn native_fps(&self) -> f64 {
        self.fps
    }

    fn name(&self) -> &str {
        &self.name
    }
}
