//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and subcommand handlers.

mod args;
mod commands;

pub use args::{
    parse_duration, parse_fps, parse_threshold, parse_width, Args, Command, ConfigAction,
    RenderOptions,
};
pub use commands::{
    handle_config_action, install_stop_handler, run, run_image, run_video, CommandError,
};
