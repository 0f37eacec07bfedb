//! Synchronization plan building

use std::path::Path;

use tracing::info;

use crate::domain::factor::CorrectionFactor;
use crate::domain::model::{SyncDirective, SyncPlan, TrackReport};
use crate::error::PalFixResult;
use crate::planner::chapters::ChapterCorrector;
use crate::ports::ToolRunner;
use crate::streams::retimer::TimecodeRewriter;

/// One rate change per non-audio track, in report order
///
/// Audio is left out: the multiplexer cannot resample, so it is handled by
/// the transcoder stage instead.
pub fn sync_directives(report: &TrackReport, factor: CorrectionFactor) -> Vec<SyncDirective> {
    report
        .non_audio_tracks()
        .map(|track| SyncDirective::new(track.id, factor))
        .collect()
}

/// Builds the remux plan for one input
pub struct SyncPlanner<'a> {
    runner: &'a dyn ToolRunner,
    rewriter: TimecodeRewriter,
}

impl<'a> SyncPlanner<'a> {
    pub fn new(runner: &'a dyn ToolRunner, factor: CorrectionFactor) -> Self {
        Self {
            runner,
            rewriter: TimecodeRewriter::new(factor),
        }
    }

    pub fn factor(&self) -> CorrectionFactor {
        self.rewriter.factor()
    }

    /// Combine track directives with the chapter sub-pipeline when chapters exist
    pub fn build(&self, input: &Path, report: &TrackReport, workdir: &Path) -> PalFixResult<SyncPlan> {
        let directives = sync_directives(report, self.factor());
        info!(
            "Planned {} sync directive(s) at rate {}",
            directives.len(),
            self.factor()
        );

        let chapters = if report.has_chapters {
            ChapterCorrector::new(self.runner, &self.rewriter).correct(input, workdir)?
        } else {
            None
        };

        Ok(SyncPlan {
            directives,
            chapters,
        })
    }
}
