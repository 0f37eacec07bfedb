//! CLI module for PalFix
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::Parser;

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

pub use args::{OverwritePolicy, ToolArgs};

/// PalFix
///
/// Slow down a Matroska-contained video to correct for PAL speedup. Video and
/// subtitle tracks are rate-corrected without re-encoding, chapters are
/// re-timed, and audio is resampled.
#[derive(Parser, Debug)]
#[command(name = "fix-pal")]
#[command(about = "Slow down a Matroska-contained video to correct for PAL speedup")]
#[command(version)]
pub struct Cli {
    /// The file to be processed
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// The filename for the new, processed file
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    /// Correction factor as N/D (default 25/24)
    #[arg(long, env = "PALFIX_FACTOR")]
    pub factor: Option<String>,

    /// What to do when the output file already exists
    #[arg(long, value_enum, default_value_t = OverwritePolicy::Prompt, env = "PALFIX_OVERWRITE")]
    pub overwrite: OverwritePolicy,

    /// Settings file (defaults to ./palfix.toml when present)
    #[arg(long, env = "PALFIX_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level or filter directive
    #[arg(long, env = "PALFIX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Logging output format
    #[arg(long, value_enum, env = "PALFIX_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(flatten)]
    pub tools: ToolArgs,
}
