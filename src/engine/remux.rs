//! Lossless remux stage: rate-corrects non-audio tracks and swaps chapters

use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::domain::model::SyncPlan;
use crate::error::{PalFixError, PalFixResult};
use crate::ports::{Tool, ToolRunner};

/// Build the multiplexer command line for `plan`
///
/// Order: output, sync directives, chapter suppression, replacement
/// chapters, input.
pub fn remux_args(input: &Path, output: &Path, plan: &SyncPlan) -> Vec<OsString> {
    let mut args = vec![OsString::from("--output"), output.as_os_str().to_os_string()];

    for directive in &plan.directives {
        args.push(OsString::from("--sync"));
        args.push(OsString::from(directive.to_string()));
    }

    args.push(OsString::from("--no-chapters"));

    if let Some(chapters) = plan.replacement_chapters() {
        args.push(OsString::from("--chapters"));
        args.push(chapters.as_os_str().to_os_string());
    }

    args.push(input.as_os_str().to_os_string());
    args
}

/// Runs the multiplexer
pub struct Remuxer<'a> {
    runner: &'a dyn ToolRunner,
}

impl<'a> Remuxer<'a> {
    pub fn new(runner: &'a dyn ToolRunner) -> Self {
        Self { runner }
    }

    /// Write the rate-corrected container to `output`
    pub fn remux(&self, input: &Path, output: &Path, plan: &SyncPlan) -> PalFixResult<()> {
        let started = Instant::now();
        info!("Remuxing {} -> {}", input.display(), output.display());

        self.runner
            .run_checked(Tool::Mkvmerge, &remux_args(input, output, plan))?;

        if !output.is_file() {
            return Err(PalFixError::ToolFailed {
                tool: Tool::Mkvmerge,
                exit_code: 0,
                stderr: format!("no output written to {}", output.display()),
            });
        }

        info!("Remux finished in {:.1}s", started.elapsed().as_secs_f64());
        Ok(())
    }
}
