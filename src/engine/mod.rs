//! Correction pipeline: classify, plan, remux, resample
//!
//! The pipeline is linear. All intermediate files live in a scoped temporary
//! directory that is removed when the run ends, whether it succeeded or not.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info};

use crate::domain::factor::CorrectionFactor;
use crate::error::PalFixResult;
use crate::planner::SyncPlanner;
use crate::ports::ToolRunner;
use crate::probe::inspector::ContainerInspector;
use crate::probe::report::SampleRate;

pub mod remux;
pub mod resample;

pub use remux::Remuxer;
pub use resample::{AudioResampler, ResampleOutcome};

/// Name of the rate-corrected container inside the work directory
pub const INTERMEDIATE_FILE: &str = "intermediate.mkv";

/// Prefix of the scoped work directory
pub const WORKDIR_PREFIX: &str = "palfix-";

/// Pipeline stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet
    Start,
    /// Tracks classified and sync plan built
    Planned,
    /// Intermediate container written
    Remuxed,
    /// Final output written
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Planned => "planned",
            Stage::Remuxed => "remuxed",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Final output path
    pub output: PathBuf,
    /// Tracks rate-corrected by the multiplexer
    pub synced_tracks: Vec<u32>,
    /// Whether chapters were re-timed
    pub chapters_corrected: bool,
    /// Source sampling frequency, if audio was resampled
    pub sample_rate: Option<SampleRate>,
    /// Last stage reached
    pub stage: Stage,
}

/// Runs the full correction for one input file
pub struct CorrectionPipeline<'a> {
    runner: &'a dyn ToolRunner,
    factor: CorrectionFactor,
}

impl<'a> CorrectionPipeline<'a> {
    pub fn new(runner: &'a dyn ToolRunner, factor: CorrectionFactor) -> Self {
        Self { runner, factor }
    }

    pub fn factor(&self) -> CorrectionFactor {
        self.factor
    }

    /// Correct `input` into `output` using a fresh temporary work directory
    pub fn run(&self, input: &Path, output: &Path) -> PalFixResult<RunSummary> {
        let workdir = tempfile::Builder::new().prefix(WORKDIR_PREFIX).tempdir()?;
        info!("Work directory: {}", workdir.path().display());

        let result = self.run_in(input, output, workdir.path());

        // Dropping the TempDir removes it on every path; close() reports failures.
        if let Err(e) = workdir.close() {
            error!("Failed to remove work directory: {}", e);
        }
        result
    }

    /// Correct `input` into `output`, keeping intermediates in `workdir`
    pub fn run_in(&self, input: &Path, output: &Path, workdir: &Path) -> PalFixResult<RunSummary> {
        let started = Instant::now();
        let mut stage = Stage::Start;
        info!(
            "Correcting {} by {} (x{:.6})",
            input.display(),
            self.factor,
            self.factor.to_f64()
        );

        let report = ContainerInspector::new(self.runner).identify(input)?;
        let plan = SyncPlanner::new(self.runner, self.factor).build(input, &report, workdir)?;
        advance(&mut stage, Stage::Planned);

        let intermediate = workdir.join(INTERMEDIATE_FILE);
        Remuxer::new(self.runner).remux(input, &intermediate, &plan)?;
        advance(&mut stage, Stage::Remuxed);

        let outcome = AudioResampler::new(self.runner, self.factor).resample(
            &intermediate,
            output,
            report.has_audio(),
        )?;
        advance(&mut stage, Stage::Done);

        info!(
            "Wrote {} in {:.1}s",
            output.display(),
            started.elapsed().as_secs_f64()
        );

        Ok(RunSummary {
            output: output.to_path_buf(),
            synced_tracks: plan.directives.iter().map(|d| d.track_id).collect(),
            chapters_corrected: plan.chapters.is_some(),
            sample_rate: outcome.sample_rate,
            stage,
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    info!("Stage {} -> {}", stage, next);
    *stage = next;
}
