//! Error handling module for PalFix

use std::path::PathBuf;

use thiserror::Error;

use crate::ports::Tool;

/// Main error type for PalFix operations
#[derive(Error, Debug)]
pub enum PalFixError {
    /// One or more required external tools could not be located
    #[error(
        "the following utilities are missing from your system:\n\t{}\nPlease install them in order to use this program.",
        .tools.join("\n\t")
    )]
    ToolsMissing { tools: Vec<String> },

    /// Input path does not exist
    #[error("input path does not exist: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// Input path exists but is not a regular file
    #[error("input path is not a regular file: {}", .path.display())]
    InputNotFile { path: PathBuf },

    /// Input and output resolve to the same file
    #[error("input and output paths are identical: {}", .path.display())]
    IdenticalPaths { path: PathBuf },

    /// Output path points at a directory
    #[error("output path is a directory: {}", .path.display())]
    OutputIsDirectory { path: PathBuf },

    /// External tool could not be started
    #[error("failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: Tool,
        #[source]
        source: std::io::Error,
    },

    /// External tool exited with a failure status
    #[error("{tool} exited with status {exit_code}: {stderr}")]
    ToolFailed {
        tool: Tool,
        exit_code: i32,
        stderr: String,
    },

    /// External tool produced a report we do not recognize
    #[error("unrecognized {tool} report: {message}")]
    ReportUnparseable { tool: Tool, message: String },

    /// Correction factor is not a positive rational
    #[error("invalid correction factor '{value}': {reason}")]
    InvalidFactor { value: String, reason: String },

    /// Settings file could not be read or parsed
    #[error("configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PalFix operations
pub type PalFixResult<T> = std::result::Result<T, PalFixError>;
