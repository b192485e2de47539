//! Animated GIF decoding through the `image` crate.
//!
//! Frames are decoded on a background thread that stays a few frames ahead
//! of the reader, so a scan that stops early never touches the rest of the
//! file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Delay, DynamicImage, Frame, ImageResult};

use super::{source_name, FrameSource, SourceError};

/// Frame rate assumed when a GIF declares a zero delay.
pub const DEFAULT_GIF_FPS: f64 = 10.0;

/// Frames the decoding thread may buffer ahead of the reader.
const DECODE_AHEAD: usize = 4;

/// An animated GIF decoded frame by frame.
///
/// The native rate comes from the first frame's delay. Later frames with a
/// different delay are still yielded in order but their timing follows the
/// first frame's rate.
pub struct GifSource {
    name: String,
    path: PathBuf,
    fps: f64,
    first_delay: Option<Delay>,
    varying_delays: bool,
    pending: Option<Frame>,
    frames: Option<Receiver<ImageResult<Frame>>>,
    decoder: Option<JoinHandle<()>>,
}

impl GifSource {
    /// Open `path` and decode its first frame.
    ///
    /// A file whose header or first frame cannot be decoded fails here. Errors
    /// in later frames surface from the iterator when that frame is reached.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|e| SourceError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (tx, rx) = mpsc::sync_channel(DECODE_AHEAD);
        let decoder = thread::spawn(move || {
            let decoder = match GifDecoder::new(BufReader::new(file)) {
                Ok(decoder) => decoder,
                Err(e) => {
                    let _ = tx.send(Err(e));
                    return;
                }
            };
            for frame in decoder.into_frames() {
                let failed = frame.is_err();
                // Receiver gone means the source was dropped
                if tx.send(frame).is_err() || failed {
                    break;
                }
            }
        });

        let mut source = Self {
            name: source_name(path),
            path: path.to_path_buf(),
            fps: DEFAULT_GIF_FPS,
            first_delay: None,
            varying_delays: false,
            pending: None,
            frames: Some(rx),
            decoder: Some(decoder),
        };

        match source.recv() {
            Some(Ok(frame)) => {
                let delay = frame.delay();
                let (numer, denom) = delay.numer_denom_ms();
                source.fps = fps_from_delay(numer, denom);
                source.first_delay = Some(delay);
                source.pending = Some(frame);
            }
            Some(Err(e)) => {
                return Err(SourceError::Decode {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
            None => log::warn!("{}: GIF contains no frames", path.display()),
        }

        log::debug!("{}: GIF at {:.2} fps", source.name, source.fps);
        Ok(source)
    }

    /// Whether a frame read so far declared a delay different from the first.
    pub fn has_varying_delays(&self) -> bool {
        self.varying_delays
    }

    fn recv(&mut self) -> Option<ImageResult<Frame>> {
        let frame = self.frames.as_ref()?.recv().ok();
        if frame.is_none() {
            self.frames = None;
        }
        frame
    }

    fn note_delay(&mut self, delay: Delay) {
        if self.varying_delays || self.first_delay == Some(delay) {
            return;
        }
        self.varying_delays = true;
        let (numer, denom) = delay.numer_denom_ms();
        log::warn!(
            "{}: frame delays vary ({:.1} ms here); timestamps assume {:.2} fps",
            self.name,
            numer as f64 / denom.max(1) as f64,
            self.fps
        );
    }
}

/// Frames per second for a frame delay of `numer / denom` milliseconds.
pub fn fps_from_delay(numer: u32, denom: u32) -> f64 {
    if numer == 0 || denom == 0 {
        return DEFAULT_GIF_FPS;
    }
    1000.0 * denom as f64 / numer as f64
}

impl Iterator for GifSource {
    type Item = Result<DynamicImage, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = match self.pending.take() {
            Some(frame) => frame,
            None => match self.recv()? {
                Ok(frame) => {
                    self.note_delay(frame.delay());
                    frame
                }
                Err(e) => {
                    self.frames = None;
                    return Some(Err(SourceError::Decode {
                        path: self.path.clone(),
                        source: e,
                    }));
                }
            },
        };
        Some(Ok(DynamicImage::ImageRgba8(frame.into_buffer())))
    }
}

impl FrameSource for GifSource {
    fn native_fps(&self) -> f64 {
        self.fps
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for GifSource {
    fn drop(&mut self) {
        // Dropping the receiver first unblocks a decoder waiting to send
        self.frames = None;
        if let Some(handle) = self.decoder.take() {
            let _ = handle.join();
        }
    }
}
