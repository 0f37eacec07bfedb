//! Command-line argument definitions

use std::fmt;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::adapters::toml_config::ToolPaths;

/// Overwrite behavior for an existing output file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OverwritePolicy {
    /// Ask on the terminal
    #[default]
    Prompt,
    /// Overwrite without asking
    Always,
    /// Stop without touching the file
    Never,
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverwritePolicy::Prompt => "prompt",
            OverwritePolicy::Always => "always",
            OverwritePolicy::Never => "never",
        };
        f.write_str(name)
    }
}

/// Explicit tool locations
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to mkvmerge
    #[arg(long, env = "PALFIX_MKVMERGE", value_name = "PATH")]
    pub mkvmerge: Option<PathBuf>,

    /// Path to mkvextract
    #[arg(long, env = "PALFIX_MKVEXTRACT", value_name = "PATH")]
    pub mkvextract: Option<PathBuf>,

    /// Path to mkvinfo
    #[arg(long, env = "PALFIX_MKVINFO", value_name = "PATH")]
    pub mkvinfo: Option<PathBuf>,

    /// Path to ffmpeg
    #[arg(long, env = "PALFIX_FFMPEG", value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,
}

impl ToolArgs {
    pub fn to_tool_paths(&self) -> ToolPaths {
        ToolPaths {
            ffmpeg: self.ffmpeg.clone(),
            mkvextract: self.mkvextract.clone(),
            mkvinfo: self.mkvinfo.clone(),
            mkvmerge: self.mkvmerge.clone(),
        }
    }
}
