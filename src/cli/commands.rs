//! Command implementations

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{ProcessRunner, Toolchain};
use crate::cli::{Cli, OverwritePolicy};
use crate::config_initialization::RunConfig;
use crate::engine::{CorrectionPipeline, RunSummary};
use crate::probe::{OutputState, PathValidator};

/// How the correct command ended
#[derive(Debug)]
pub enum Outcome {
    /// The output file was written
    Completed(RunSummary),
    /// The user chose not to overwrite an existing output
    Declined,
}

/// Execute the correction: check tools and paths, confirm, then run the pipeline
pub fn correct(cli: &Cli, config: &RunConfig) -> Result<Outcome> {
    let toolchain = Toolchain::locate(&config.tools)?;

    PathValidator::validate_input(&cli.input)?;
    let state = PathValidator::validate_output(&cli.input, &cli.output)?;

    if state == OutputState::Exists {
        let proceed = match config.overwrite {
            OverwritePolicy::Always => true,
            OverwritePolicy::Never => false,
            OverwritePolicy::Prompt => {
                let stdin = io::stdin();
                confirm_overwrite(&cli.output, stdin.lock(), io::stdout())
                    .context("Failed to read overwrite confirmation")?
            }
        };
        if !proceed {
            warn!("Not overwriting {}", cli.output.display());
            return Ok(Outcome::Declined);
        }
        info!("Overwriting {}", cli.output.display());
    }

    let runner = ProcessRunner::new(&toolchain);
    let summary = CorrectionPipeline::new(&runner, config.factor)
        .run(&cli.input, &cli.output)
        .with_context(|| format!("Failed to correct {}", cli.input.display()))?;

    Ok(Outcome::Completed(summary))
}

/// Ask whether `output` may be replaced; only `y` or `Y` agrees
pub fn confirm_overwrite<R: BufRead, W: Write>(output: &Path, mut input: R, mut prompt: W) -> io::Result<bool> {
    write!(
        prompt,
        "Output file {} already exists. Overwrite it? [y|N] ",
        output.display()
    )?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
