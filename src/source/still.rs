//! Single still images.

use std::path::Path;

use image::DynamicImage;

use super::{source_name, FrameSource, SourceError};

/// A decoded still image, yielded as a one-frame source.
pub struct StillImage {
    name: String,
    image: Option<DynamicImage>,
}

impl StillImage {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let image = image::open(path).map_err(|e| SourceError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(source_name(path), image))
    }

    pub fn new(name: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            name: name.into(),
            image: Some(image),
        }
    }
}

impl Iterator for StillImage {
    type Item = Result<DynamicImage, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.image.take().map(Ok)
    }
}

impl FrameSource for StillImage {
    fn native_fps(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        &self.name
    }
}
