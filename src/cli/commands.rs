//! Subcommand handlers for image, video and config actions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::args::{Args, Command, ConfigAction, RenderOptions};
use crate::braille::QuantizerConfig;
use crate::config::{default_path, Config, ConfigFileError, ImageConfig, VideoConfig};
use crate::error::ConfigError;
use crate::output::{self, Manifest, OutputError, VideoSummary};
use crate::pipeline::{convert_image, FramePipeline, PipelineConfig, PipelineError};
use crate::source::{self, FrameSource, SourceError, StillImage};

/// Frames the decoder may run ahead of conversion with `--pipelined`.
const PIPELINE_CAPACITY: usize = 8;

/// Errors reported by the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("failed to create Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Dispatch parsed arguments to the matching handler.
pub fn run(args: Args) -> Result<(), CommandError> {
    let config_path = args.config.clone().unwrap_or_else(default_path);

    match args.command {
        Command::Config { action } => handle_config_action(action, &config_path),
        Command::Image {
            path,
            output,
            render,
        } => {
            let config = Config::load(Some(config_path.as_path()))?;
            run_image(&path, output.as_deref(), &render, &config.image)
        }
        Command::Video {
            path,
            render,
            fps,
            max_duration,
            output_dir,
            manifest,
            pipelined,
        } => {
            let mut config = Config::load(Some(config_path.as_path()))?.video;
            if let Some(fps) = fps {
                config.fps = fps;
            }
            if let Some(secs) = max_duration {
                config.max_duration = secs;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let stop = install_stop_handler()?;
            run_video(&path, &render, &config, manifest, pipelined, stop)
        }
    }
}

fn quantizer_from(
    render: &RenderOptions,
    width: u32,
    threshold: i64,
    invert: bool,
) -> Result<QuantizerConfig, ConfigError> {
    QuantizerConfig::new(
        render.width.unwrap_or(width),
        render.threshold.unwrap_or(threshold),
        render.invert.unwrap_or(invert),
    )
}

/// Convert one still image, printing it or writing it to `output`.
pub fn run_image(
    path: &Path,
    output: Option<&Path>,
    render: &RenderOptions,
    config: &ImageConfig,
) -> Result<(), CommandError> {
    let quantizer = quantizer_from(render, config.width, config.threshold, config.invert)?;
    let background = render.background.unwrap_or(config.background);

    let mut still = StillImage::open(path)?;
    let image = match still.next() {
        Some(frame) => frame?,
        None => return Ok(()),
    };
    let glyphs = convert_image(&image, &quantizer, background);
    if glyphs.is_empty() {
        log::warn!(
            "{}: image is too wide to produce a full character row at width {}",
            path.display(),
            quantizer.target_width()
        );
    }

    let text = glyphs.to_text();
    match output {
        Some(out) => {
            output::write_text(out, &text)?;
            println!("Saved to {}", out.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Convert a video into per-frame text files plus a summary.
pub fn run_video(
    path: &Path,
    render: &RenderOptions,
    config: &VideoConfig,
    write_manifest: bool,
    pipelined: bool,
    stop: Arc<AtomicBool>,
) -> Result<(), CommandError> {
    let quantizer = quantizer_from(render, config.width, config.threshold, config.invert)?;
    let background = render.background.unwrap_or(config.background);
    let pipeline_config =
        PipelineConfig::new(quantizer, background, config.fps, config.max_duration)?;
    let pipeline = FramePipeline::new(pipeline_config).with_stop_flag(stop);

    println!("Converting: {}", path.display());
    let source = source::open(path)?;
    let source_name = source.name().to_string();
    let native_fps = source.native_fps();

    let samples = if pipelined {
        pipeline.run_pipelined(source, PIPELINE_CAPACITY)?
    } else {
        pipeline.run(source)?
    };

    if samples.is_empty() {
        println!("No frames were sampled from {}", path.display());
        return Ok(());
    }

    let dir = &config.output_dir;
    output::write_frames(dir, &samples)?;

    let summary = VideoSummary {
        source_name,
        native_fps,
        output_fps: config.fps,
        width: quantizer.target_width(),
        total_frames: samples.len(),
    };
    output::write_summary(&dir.join("summary.txt"), &summary)?;
    if write_manifest {
        let manifest = Manifest::new(summary, &samples);
        output::write_manifest(&dir.join("manifest.json"), &manifest)?;
    }

    println!(
        "Created {} braille frames in {}",
        samples.len(),
        dir.display()
    );
    Ok(())
}

/// Set up the Ctrl+C handler, returning the flag it raises.
///
/// This should be called once per process.
pub fn install_stop_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, writing frames converted so far...");
    })?;
    Ok(stop)
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: &Path) -> Result<(), CommandError> {
    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(path))?;
            println!("Current configuration:");
            println!();
            print!("{}", config.to_toml().unwrap_or_default());
            println!();
            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(CommandError::ConfigExists(path.to_path_buf()));
            }
            let body = Config::default().to_toml().unwrap_or_default();
            let text = format!("# braille-art configuration\n\n{}", body);
            output::write_text(path, &text)?;
            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}
