//! Track classification and sample rate lookup via the inspector tools

use std::ffi::OsString;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::model::TrackReport;
use crate::error::PalFixResult;
use crate::ports::{Tool, ToolRunner};
use crate::probe::report::{ReportParser, SampleRate};

/// Runs `mkvmerge -i` and `mkvinfo` and hands their reports to the parser
pub struct ContainerInspector<'a> {
    runner: &'a dyn ToolRunner,
    parser: ReportParser,
}

impl<'a> ContainerInspector<'a> {
    pub fn new(runner: &'a dyn ToolRunner) -> Self {
        Self {
            runner,
            parser: ReportParser::new(),
        }
    }

    /// List tracks, classify them as audio or not, and detect chapters
    pub fn identify(&self, input: &Path) -> PalFixResult<TrackReport> {
        info!("Identifying tracks in {}", input.display());

        let args = [OsString::from("-i"), input.as_os_str().to_os_string()];
        let output = self.runner.run_checked(Tool::Mkvmerge, &args)?;
        let report = self.parser.parse_identification(&output.stdout)?;

        for track in &report.tracks {
            info!(
                track_id = track.id,
                audio = track.is_audio(),
                "Track {}: {}",
                track.id,
                track.descriptor
            );
        }
        if report.has_chapters {
            info!("Input carries chapters");
        }

        Ok(report)
    }

    /// Sampling frequency of the first channel of the first audio track
    pub fn sampling_frequency(&self, input: &Path) -> PalFixResult<Option<SampleRate>> {
        let args = [input.as_os_str().to_os_string()];
        let output = self.runner.run_checked(Tool::Mkvinfo, &args)?;
        let rate = self.parser.parse_sampling_frequency(&output.stdout)?;

        match &rate {
            Some(rate) => info!("Audio sampling frequency: {} Hz", rate),
            None => warn!("No sampling frequency reported for {}", input.display()),
        }
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PalFixError;
    use crate::ports::ToolOutput;
    use std::cell::RefCell;

    struct CannedRunner {
        output: ToolOutput,
        calls: RefCell<Vec<(Tool, Vec<OsString>)>>,
    }

    impl ToolRunner for CannedRunner {
        fn run(&self, tool: Tool, args: &[OsString]) -> PalFixResult<ToolOutput> {
            self.calls.borrow_mut().push((tool, args.to_vec()));
            Ok(self.output.clone())
        }
    }

    fn canned(output: ToolOutput) -> CannedRunner {
        CannedRunner {
            output,
            calls: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn identify_invokes_mkvmerge() {
        let runner = canned(ToolOutput::success(
            "Track ID 0: video (AVC)\nTrack ID 1: audio (AAC)\n",
        ));
        let report = ContainerInspector::new(&runner)
            .identify(Path::new("in.mkv"))
            .unwrap();

        assert_eq!(report.tracks.len(), 2);
        let calls = runner.calls.borrow();
        assert_eq!(calls[0].0, Tool::Mkvmerge);
        assert_eq!(calls[0].1, vec![OsString::from("-i"), OsString::from("in.mkv")]);
    }

    #[test]
    fn identify_surfaces_tool_failure() {
        let runner = canned(ToolOutput {
            exit_code: Some(2),
            stdout: "Error: The file could not be opened".to_string(),
            stderr: String::new(),
        });
        let err = ContainerInspector::new(&runner)
            .identify(Path::new("in.mkv"))
            .unwrap_err();
        assert!(matches!(
            err,
            PalFixError::ToolFailed { tool: Tool::Mkvmerge, exit_code: 2, .. }
        ));
    }

    #[test]
    fn sampling_frequency_invokes_mkvinfo() {
        let runner = canned(ToolOutput::success("|   + Sampling frequency: 44100\n"));
        let rate = ContainerInspector::new(&runner)
            .sampling_frequency(Path::new("tmp.mkv"))
            .unwrap();
        assert_eq!(rate.unwrap().as_str(), "44100");
        assert_eq!(runner.calls.borrow()[0].0, Tool::Mkvinfo);
    }
}
