//! Video decoding through an external FFmpeg process.
//!
//! `ffprobe` reports the stream geometry and frame rate, then `ffmpeg`
//! decodes to raw RGBA on stdout, one fixed-size frame after another.

use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use image::{DynamicImage, RgbaImage};

use super::{source_name, FrameSource, SourceError};

/// Geometry and timing of a video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl VideoInfo {
    /// Bytes in one decoded RGBA frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Parse an FFmpeg frame rate such as `30000/1001` or `25`.
///
/// Returns `None` for malformed input or a zero denominator.
pub fn parse_frame_rate(s: &str) -> Option<f64> {
    let s = s.trim();
    match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => s.parse().ok(),
    }
}

/// Parse `key=value` lines printed by `ffprobe -of default=noprint_wrappers=1`.
///
/// A missing or unreadable frame rate is reported as 0 fps and rejected
/// later by the pipeline.
pub fn parse_probe_output(text: &str) -> Option<VideoInfo> {
    let mut width = None;
    let mut height = None;
    let mut fps = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "width" => width = value.trim().parse().ok(),
            "height" => height = value.trim().parse().ok(),
            "r_frame_rate" => fps = parse_frame_rate(value),
            _ => {}
        }
    }

    Some(VideoInfo {
        width: width?,
        height: height?,
        fps: fps.unwrap_or(0.0),
    })
}

/// Query the first video stream of `path` with `ffprobe`.
pub fn probe(path: &Path) -> Result<VideoInfo, SourceError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| SourceError::spawn("ffprobe", e))?;

    if !output.status.success() {
        return Err(SourceError::ProbeFailed {
            path: path.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match parse_probe_output(&stdout) {
        Some(info) if info.width > 0 && info.height > 0 => Ok(info),
        _ => Err(SourceError::ProbeFailed {
            path: path.to_path_buf(),
            message: "no video stream found".to_string(),
        }),
    }
}

/// Build the `ffmpeg` invocation that streams `path` as raw RGBA frames.
///
/// Autorotation is disabled so the decoded frames keep the stored geometry
/// that `ffprobe` reported. Rotated clips come out sideways rather than
/// with mismatched row lengths.
pub fn decode_command(path: &Path) -> Command {
    let mut command = Command::new("ffmpeg");
    command
        .args(["-v", "error", "-nostdin", "-noautorotate", "-i"])
        .arg(path)
        .args(["-f", "rawvideo", "-pix_fmt", "rgba", "-"]);
    command
}

/// Frames decoded by a running `ffmpeg` process.
pub struct FfmpegSource {
    name: String,
    info: VideoInfo,
    child: Child,
    stdout: Option<ChildStdout>,
    stderr_thread: Option<JoinHandle<()>>,
    frames_read: u64,
}

impl FfmpegSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let info = probe(path)?;
        log::info!(
            "{}: {}x{} at {:.3} fps",
            path.display(),
            info.width,
            info.height,
            info.fps
        );

        let mut child = decode_command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SourceError::spawn("ffmpeg", e))?;

        // Forward decoder diagnostics to the log
        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines() {
                    match line {
                        Ok(l) => log::warn!("[ffmpeg] {}", l),
                        Err(_) => break,
                    }
                }
            })
        });
        let stdout = child.stdout.take();

        Ok(Self {
            name: source_name(path),
            info,
            child,
            stdout,
            stderr_thread,
            frames_read: 0,
        })
    }

    pub fn info(&self) -> VideoInfo {
        self.info
    }
}

impl Iterator for FfmpegSource {
    type Item = Result<DynamicImage, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let stdout = self.stdout.as_mut()?;
        let index = self.frames_read;
        let mut buf = vec![0u8; self.info.frame_len()];

        if let Err(e) = stdout.read_exact(&mut buf) {
            self.stdout = None;
            if e.kind() == ErrorKind::UnexpectedEof {
                log::debug!("ffmpeg stream ended after {} frames", index);
                return None;
            }
            return Some(Err(SourceError::ReadFailed { index, source: e }));
        }

        self.frames_read += 1;
        match RgbaImage::from_raw(self.info.width, self.info.height, buf) {
            Some(frame) => Some(Ok(DynamicImage::ImageRgba8(frame))),
            None => Some(Err(SourceError::ReadFailed {
                index,
                source: std::io::Error::new(ErrorKind::InvalidData, "short frame buffer"),
            })),
        }
    }
}

impl FrameSource for FfmpegSource {
    fn native_fps(&self) -> f64 {
        self.info.fps
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        // Closing stdout first lets ffmpeg exit on a broken pipe
        self.stdout = None;
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        if let Some(handle) = self.stderr_thread.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn test_parse_probe_output() {
        let text = "width=1920\nheight=1080\nr_frame_rate=30/1\n";
        assert_eq!(
            parse_probe_output(text),
            Some(VideoInfo {
                width: 1920,
                height: 1080,
                fps: 30.0
            })
        );
    }

    #[test]
    fn test_parse_probe_output_unknown_rate() {
        let info = parse_probe_output("width=640\nheight=480\nr_frame_rate=0/0").unwrap();
        assert_eq!(info.fps, 0.0);
    }

    #[test]
    fn test_parse_probe_output_missing_geometry() {
        assert_eq!(parse_probe_output("r_frame_rate=30/1"), None);
        assert_eq!(parse_probe_output(""), None);
    }

    #[test]
    fn test_decode_command_keeps_stored_geometry() {
        let command = decode_command(Path::new("clip.mp4"));
        assert_eq!(command.get_program(), "ffmpeg");

        let args: Vec<&str> = command
            .get_args()
            .map(|a| a.to_str().unwrap())
            .collect();
        let noautorotate = args.iter().position(|a| *a == "-noautorotate").unwrap();
        let input = args.iter().position(|a| *a == "-i").unwrap();
        // Input options only apply when they precede -i
        assert!(noautorotate < input);
        assert_eq!(args[input + 1], "clip.mp4");
        assert!(args.ends_with(&["-f", "rawvideo", "-pix_fmt", "rgba", "-"]));
    }

    #[test]
    fn test_frame_len() {
        let info = VideoInfo {
            width: 4,
            height: 2,
            fps: 30.0,
        };
        assert_eq!(info.frame_len(), 32);
    }
}
