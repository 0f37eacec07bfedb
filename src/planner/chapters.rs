//! Chapter extraction and re-timing

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::model::ChapterRewrite;
use crate::error::PalFixResult;
use crate::ports::{Tool, ToolRunner};
use crate::streams::retimer::TimecodeRewriter;

/// Chapter XML as extracted from the input
pub const ORIGINAL_CHAPTERS_FILE: &str = "chapters-original.xml";
/// Chapter XML after re-timing, handed to the remux stage
pub const CORRECTED_CHAPTERS_FILE: &str = "chapters-corrected.xml";

/// Pulls the chapter list out of a container and rewrites its timecodes
pub struct ChapterCorrector<'a> {
    runner: &'a dyn ToolRunner,
    rewriter: &'a TimecodeRewriter,
}

impl<'a> ChapterCorrector<'a> {
    pub fn new(runner: &'a dyn ToolRunner, rewriter: &'a TimecodeRewriter) -> Self {
        Self { runner, rewriter }
    }

    /// Extract chapters from `input` into `workdir` and write a corrected copy next to it
    ///
    /// Returns `None` when the extractor wrote nothing, which happens when the
    /// chapter marker in the report was a false positive.
    pub fn correct(&self, input: &Path, workdir: &Path) -> PalFixResult<Option<ChapterRewrite>> {
        let original = workdir.join(ORIGINAL_CHAPTERS_FILE);
        let corrected = workdir.join(CORRECTED_CHAPTERS_FILE);

        let args = [
            input.as_os_str().to_os_string(),
            OsString::from("chapters"),
            original.as_os_str().to_os_string(),
        ];
        self.runner.run_checked(Tool::Mkvextract, &args)?;

        let extracted = match fs::metadata(&original) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        if extracted == 0 {
            warn!("No chapter data extracted from {}", input.display());
            return Ok(None);
        }

        info!("Extracted {} bytes of chapter markup", extracted);
        self.rewriter.rewrite_file(&original, &corrected)?;

        Ok(Some(ChapterRewrite {
            original,
            corrected,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factor::CorrectionFactor;
    use crate::error::PalFixError;
    use crate::ports::ToolOutput;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Writes `content` to the last argument, as mkvextract would
    struct FakeExtractor {
        content: Option<&'static str>,
    }

    impl ToolRunner for FakeExtractor {
        fn run(&self, tool: Tool, args: &[OsString]) -> PalFixResult<ToolOutput> {
            assert_eq!(tool, Tool::Mkvextract);
            assert_eq!(args[1], OsString::from("chapters"));
            if let Some(content) = self.content {
                fs::write(PathBuf::from(&args[2]), content)?;
            }
            Ok(ToolOutput::success(""))
        }
    }

    #[test]
    fn extracts_and_rewrites() {
        let dir = TempDir::new().unwrap();
        let runner = FakeExtractor {
            content: Some("<ChapterTimeStart>00:00:48.000000000</ChapterTimeStart>\n"),
        };
        let rewriter = TimecodeRewriter::new(CorrectionFactor::PAL);

        let rewrite = ChapterCorrector::new(&runner, &rewriter)
            .correct(Path::new("in.mkv"), dir.path())
            .unwrap()
            .unwrap();

        assert_eq!(rewrite.original, dir.path().join(ORIGINAL_CHAPTERS_FILE));
        assert_eq!(
            fs::read_to_string(&rewrite.corrected).unwrap(),
            "<ChapterTimeStart>00:00:50.000000000</ChapterTimeStart>\n"
        );
    }

    #[test]
    fn nothing_extracted_means_no_rewrite() {
        let dir = TempDir::new().unwrap();
        let runner = FakeExtractor { content: None };
        let rewriter = TimecodeRewriter::new(CorrectionFactor::PAL);

        let rewrite = ChapterCorrector::new(&runner, &rewriter)
            .correct(Path::new("in.mkv"), dir.path())
            .unwrap();
        assert!(rewrite.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_extraction_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A file where the work directory should be makes the lookup fail with ENOTDIR
        let not_a_dir = dir.path().join("workdir");
        fs::write(&not_a_dir, b"x").unwrap();
        let runner = FakeExtractor { content: None };
        let rewriter = TimecodeRewriter::new(CorrectionFactor::PAL);

        let err = ChapterCorrector::new(&runner, &rewriter)
            .correct(Path::new("in.mkv"), &not_a_dir)
            .unwrap_err();
        assert!(matches!(err, PalFixError::Io(_)));
    }

    #[test]
    fn extractor_failure_propagates() {
        struct Failing;
        impl ToolRunner for Failing {
            fn run(&self, _tool: Tool, _args: &[OsString]) -> PalFixResult<ToolOutput> {
                Ok(ToolOutput {
                    exit_code: Some(2),
                    stdout: String::new(),
                    stderr: "Error: no chapters".to_string(),
                })
            }
        }

        let dir = TempDir::new().unwrap();
        let rewriter = TimecodeRewriter::new(CorrectionFactor::PAL);
        let err = ChapterCorrector::new(&Failing, &rewriter)
            .correct(Path::new("in.mkv"), dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            PalFixError::ToolFailed { tool: Tool::Mkvextract, .. }
        ));
    }
}
