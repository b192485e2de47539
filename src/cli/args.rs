//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::composite::Background;

/// Parse and validate an output width (positive integer)
pub fn parse_width(s: &str) -> Result<u32, String> {
    let width: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid width", s))?;
    if width == 0 {
        return Err("Width must be greater than 0".to_string());
    }
    Ok(width)
}

/// Parse and validate a brightness threshold (0-255)
pub fn parse_threshold(s: &str) -> Result<i64, String> {
    let threshold: i64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid threshold", s))?;
    if !(0..=255).contains(&threshold) {
        return Err(format!(
            "Threshold must be between 0 and 255, got {}",
            threshold
        ));
    }
    Ok(threshold)
}

/// Parse and validate a target frame rate (positive integer)
pub fn parse_fps(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid framerate", s))?;
    if fps == 0 {
        return Err("Framerate must be at least 1 fps".to_string());
    }
    Ok(fps)
}

/// Parse and validate a duration limit in seconds (0 = no limit)
pub fn parse_duration(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of seconds", s))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!(
            "Duration must be a non-negative number of seconds, got {}",
            s
        ));
    }
    Ok(secs)
}

/// Convert images and videos to Unicode braille art
#[derive(Parser, Debug)]
#[command(name = "braille-art")]
#[command(version, about = "Convert images and videos to Unicode braille art", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Print an image as braille art
    braille-art image photo.png --width 80 --threshold 150

    # Dark subject on a light background, saved to a file
    braille-art image logo.png --invert -o logo.txt

    # Convert the first 10 seconds of a video at 5 fps
    braille-art video clip.mp4 --fps 5 --max-duration 10 -o frames/")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Rendering flags shared by the image and video subcommands.
/// Unset flags fall back to the config file.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Resized image width in pixels (two pixels per braille column)
    #[arg(long, short, value_parser = parse_width)]
    pub width: Option<u32>,

    /// Brightness threshold (0-255); darker pixels become dots
    #[arg(long, short, value_parser = parse_threshold)]
    pub threshold: Option<i64>,

    /// Invert brightness before thresholding (`--invert false` to disable)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub invert: Option<bool>,

    /// Background for transparent pixels
    #[arg(long, value_enum)]
    pub background: Option<Background>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a still image
    Image {
        /// Image file to convert
        path: PathBuf,

        /// Write the result to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderOptions,
    },
    /// Convert a video or animated GIF to one text file per sampled frame
    Video {
        /// Video file to convert
        path: PathBuf,

        #[command(flatten)]
        render: RenderOptions,

        /// Frames per second to sample
        #[arg(long, value_parser = parse_fps)]
        fps: Option<u32>,

        /// Seconds of video to convert (0 = whole video)
        #[arg(long, value_parser = parse_duration)]
        max_duration: Option<f64>,

        /// Directory for frame files, summary and manifest
        #[arg(long = "output-dir", short = 'o')]
        output_dir: Option<PathBuf>,

        /// Also write manifest.json with every frame
        #[arg(long)]
        manifest: bool,

        /// Decode on a separate thread while converting
        #[arg(long)]
        pipelined: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
