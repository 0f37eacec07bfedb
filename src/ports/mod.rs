// Ports - Interface definitions (contracts)

use std::ffi::OsString;
use std::fmt;

use crate::error::{PalFixError, PalFixResult};

/// External programs the pipeline drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    /// Transcoder
    Ffmpeg,
    /// Container extractor
    Mkvextract,
    /// Container inspector (detailed element dump)
    Mkvinfo,
    /// Container multiplexer, also used for track identification
    Mkvmerge,
}

impl Tool {
    /// Every tool that must be present before a run starts
    pub const ALL: [Tool; 4] = [Tool::Ffmpeg, Tool::Mkvextract, Tool::Mkvinfo, Tool::Mkvmerge];

    /// Executable name looked up on `PATH`
    pub fn program(&self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Mkvextract => "mkvextract",
            Tool::Mkvinfo => "mkvinfo",
            Tool::Mkvmerge => "mkvmerge",
        }
    }

    /// MKVToolNix programs exit with 1 when they finished with warnings
    pub fn tolerates_warnings(&self) -> bool {
        !matches!(self, Tool::Ffmpeg)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Successful output with the given stdout, mostly for fakes
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Map the exit status to a result, honoring the tool's warning convention
    pub fn check(self, tool: Tool) -> PalFixResult<Self> {
        match self.exit_code {
            Some(0) => Ok(self),
            Some(1) if tool.tolerates_warnings() => {
                tracing::warn!(%tool, "{} finished with warnings: {}", tool, self.stdout.trim());
                Ok(self)
            }
            code => Err(PalFixError::ToolFailed {
                tool,
                exit_code: code.unwrap_or(-1),
                stderr: if self.stderr.trim().is_empty() {
                    self.stdout.trim().to_string()
                } else {
                    self.stderr.trim().to_string()
                },
            }),
        }
    }
}

/// Port for running external tools
///
/// Every invocation is blocking; implementations resolve the tool's path
/// themselves and must not retry.
pub trait ToolRunner {
    /// Run `tool` with `args` and capture its output without judging the exit status
    fn run(&self, tool: Tool, args: &[OsString]) -> PalFixResult<ToolOutput>;

    /// Run `tool` and fail on a non-success exit status
    fn run_checked(&self, tool: Tool, args: &[OsString]) -> PalFixResult<ToolOutput> {
        self.run(tool, args)?.check(tool)
    }
}

impl<T: ToolRunner + ?Sized> ToolRunner for &T {
    fn run(&self, tool: Tool, args: &[OsString]) -> PalFixResult<ToolOutput> {
        (**self).run(tool, args)
    }
}
