// Process adapter - Tool discovery and blocking subprocess execution

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, error, info};

use crate::adapters::toml_config::ToolPaths;
use crate::error::{PalFixError, PalFixResult};
use crate::ports::{Tool, ToolOutput, ToolRunner};

/// Absolute locations of every external tool, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    paths: BTreeMap<Tool, PathBuf>,
}

impl Toolchain {
    /// Resolve every tool, honoring explicit overrides, and report all missing ones together
    pub fn locate(overrides: &ToolPaths) -> PalFixResult<Self> {
        let mut paths = BTreeMap::new();
        let mut missing = Vec::new();

        for tool in Tool::ALL {
            let candidate = overrides
                .get(tool)
                .map(Path::as_os_str)
                .unwrap_or_else(|| OsStr::new(tool.program()));

            match which::which(candidate) {
                Ok(path) => {
                    debug!(%tool, path = %path.display(), "Located tool");
                    paths.insert(tool, path);
                }
                Err(e) => {
                    debug!(%tool, "Tool lookup failed: {}", e);
                    missing.push(match overrides.get(tool) {
                        Some(path) => format!("{} ({})", tool, path.display()),
                        None => tool.to_string(),
                    });
                }
            }
        }

        if !missing.is_empty() {
            return Err(PalFixError::ToolsMissing { tools: missing });
        }

        info!("All required tools located");
        Ok(Self { paths })
    }

    /// Build a toolchain from already-known paths
    pub fn from_paths(paths: impl IntoIterator<Item = (Tool, PathBuf)>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn path(&self, tool: Tool) -> Option<&Path> {
        self.paths.get(&tool).map(PathBuf::as_path)
    }
}

/// Runs tools as child processes, capturing their output
pub struct ProcessRunner<'a> {
    toolchain: &'a Toolchain,
}

impl<'a> ProcessRunner<'a> {
    pub fn new(toolchain: &'a Toolchain) -> Self {
        Self { toolchain }
    }
}

impl ToolRunner for ProcessRunner<'_> {
    fn run(&self, tool: Tool, args: &[OsString]) -> PalFixResult<ToolOutput> {
        let path = self
            .toolchain
            .path(tool)
            .ok_or_else(|| PalFixError::ToolsMissing {
                tools: vec![tool.to_string()],
            })?;

        debug!(
            "Running: {} {}",
            path.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| {
                error!(%tool, "Failed to launch: {}", source);
                PalFixError::ToolLaunch { tool, source }
            })?;

        let result = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if output.status.success() {
            debug!(%tool, "Finished successfully");
        } else {
            debug!(%tool, exit_code = ?result.exit_code, "Finished with non-zero status");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_overrides_are_all_reported() {
        let overrides = ToolPaths {
            ffmpeg: Some(PathBuf::from("/nonexistent/ffmpeg")),
            mkvextract: Some(PathBuf::from("/nonexistent/mkvextract")),
            mkvinfo: Some(PathBuf::from("/nonexistent/mkvinfo")),
            mkvmerge: Some(PathBuf::from("/nonexistent/mkvmerge")),
        };
        match Toolchain::locate(&overrides) {
            Err(PalFixError::ToolsMissing { tools }) => {
                assert_eq!(tools.len(), 4);
                assert!(tools[0].starts_with("ffmpeg"));
                assert!(tools.iter().any(|t| t.contains("/nonexistent/mkvmerge")));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn runner_without_path_reports_missing_tool() {
        let toolchain = Toolchain::from_paths(Vec::<(Tool, PathBuf)>::new());
        let runner = ProcessRunner::new(&toolchain);
        assert!(matches!(
            runner.run(Tool::Mkvinfo, &[]),
            Err(PalFixError::ToolsMissing { .. })
        ));
    }

    #[test]
    fn launch_failure_names_the_tool() {
        let toolchain =
            Toolchain::from_paths([(Tool::Ffmpeg, PathBuf::from("/nonexistent/ffmpeg"))]);
        let runner = ProcessRunner::new(&toolchain);
        assert!(matches!(
            runner.run(Tool::Ffmpeg, &[]),
            Err(PalFixError::ToolLaunch { tool: Tool::Ffmpeg, .. })
        ));
    }
}
