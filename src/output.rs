//! Writing converted frames, summaries and manifests to disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pipeline::FrameSample;

/// Errors that can occur while writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Run-level metadata for a converted video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub source_name: String,
    pub native_fps: f64,
    pub output_fps: u32,
    /// Output width in characters (the configured target width).
    pub width: u32,
    pub total_frames: usize,
}

impl VideoSummary {
    /// Plain-text rendering, one `label: value` per line.
    pub fn to_text(&self) -> String {
        format!(
            "Braille video frames: {}\nSource: {}\nOriginal FPS: {}\nOutput FPS: {}\nWidth: {} chars\n",
            self.total_frames,
            self.source_name,
            format_fps(self.native_fps),
            self.output_fps,
            self.width
        )
    }
}

/// Frame rate to at most three decimals with trailing zeros dropped,
/// so `30.0` prints as `30` and `30000/1001` as `29.97`.
pub fn format_fps(fps: f64) -> String {
    let text = format!("{:.3}", fps);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// One frame record in a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub content: String,
    pub index: usize,
}

/// Summary plus every frame, for viewers that load a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub summary: VideoSummary,
    pub frames: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(summary: VideoSummary, samples: &[FrameSample]) -> Self {
        let frames = samples
            .iter()
            .map(|s| ManifestEntry {
                name: frame_file_name(s.index),
                content: s.glyph_text.clone(),
                index: s.index,
            })
            .collect();
        Self { summary, frames }
    }
}

/// File name used for the sample with the given index.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:04}.txt", index)
}

/// Write `text` to `path`, creating parent directories.
pub fn write_text(path: &Path, text: &str) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
    }
    fs::write(path, text).map_err(io_err(path))
}

/// Write each sample to `dir/frame_NNNN.txt`; returns the written paths.
pub fn write_frames(dir: &Path, samples: &[FrameSample]) -> Result<Vec<PathBuf>, OutputError> {
    fs::create_dir_all(dir).map_err(io_err(dir))?;
    let mut paths = Vec::with_capacity(samples.len());
    for sample in samples {
        let path = dir.join(frame_file_name(sample.index));
        fs::write(&path, &sample.glyph_text).map_err(io_err(&path))?;
        paths.push(path);
    }
    log::info!("wrote {} frame files to {}", paths.len(), dir.display());
    Ok(paths)
}

pub fn write_summary(path: &Path, summary: &VideoSummary) -> Result<(), OutputError> {
    write_text(path, &summary.to_text())
}

/// Write the manifest as pretty-printed JSON.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(manifest)?;
    write_text(path, &json)
}
