//! Timecode rewriting for chapter and subtitle markup
//!
//! The file is processed line by line as raw bytes, so encodings and line
//! endings survive untouched. Only `HH:MM:SS.f+` runs are replaced.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use regex::bytes::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::domain::factor::CorrectionFactor;
use crate::domain::timecode::correct_timecode;
use crate::error::PalFixResult;

/// Two-digit hours, minutes and seconds followed by a fractional part
pub const TIMECODE_PATTERN: &str = r"\d{2}:\d{2}:\d{2}\.\d+";

/// Counters collected while rewriting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Lines read
    pub lines: usize,
    /// Timecodes replaced
    pub rewritten: usize,
    /// Timecodes matched but left as they were
    pub skipped: usize,
}

/// Rewrites every timecode in a text stream by a fixed factor
pub struct TimecodeRewriter {
    factor: CorrectionFactor,
    pattern: Regex,
}

impl TimecodeRewriter {
    pub fn new(factor: CorrectionFactor) -> Self {
        Self {
            factor,
            pattern: Regex::new(TIMECODE_PATTERN).expect("timecode pattern is valid"),
        }
    }

    pub fn factor(&self) -> CorrectionFactor {
        self.factor
    }

    /// Rewrite one line; unchanged lines are borrowed
    pub fn rewrite_line<'l>(&self, line: &'l [u8], stats: &mut RewriteStats) -> Cow<'l, [u8]> {
        self.pattern.replace_all(line, |caps: &Captures<'_>| {
            let matched = &caps[0];
            let corrected = std::str::from_utf8(matched)
                .ok()
                .map(|text| (text, correct_timecode(text, self.factor)));

            match corrected {
                Some((_, Ok(new))) => {
                    stats.rewritten += 1;
                    new.into_bytes()
                }
                Some((text, Err(e))) => {
                    warn!("Leaving timecode {} unchanged: {}", text, e);
                    stats.skipped += 1;
                    matched.to_vec()
                }
                None => {
                    stats.skipped += 1;
                    matched.to_vec()
                }
            }
        })
    }

    /// Copy `reader` to `writer`, rewriting timecodes on the way
    pub fn rewrite<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<RewriteStats> {
        let mut stats = RewriteStats::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            stats.lines += 1;
            let fixed = self.rewrite_line(&line, &mut stats);
            writer.write_all(&fixed)?;
        }

        writer.flush()?;
        Ok(stats)
    }

    /// Rewrite `source` into `destination`, creating or truncating it
    pub fn rewrite_file(&self, source: &Path, destination: &Path) -> PalFixResult<RewriteStats> {
        debug!(
            "Rewriting timecodes: {} -> {}",
            source.display(),
            destination.display()
        );

        let reader = BufReader::new(File::open(source)?);
        let writer = BufWriter::new(File::create(destination)?);
        let stats = self.rewrite(reader, writer)?;

        info!(
            lines = stats.lines,
            rewritten = stats.rewritten,
            skipped = stats.skipped,
            "Retimed {} by {}",
            source.display(),
            self.factor
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rewriter() -> TimecodeRewriter {
        TimecodeRewriter::new(CorrectionFactor::PAL)
    }

    fn rewrite_bytes(input: &[u8]) -> (Vec<u8>, RewriteStats) {
        let mut out = Vec::new();
        let stats = rewriter().rewrite(input, &mut out).unwrap();
        (out, stats)
    }

    #[test]
    fn rewrites_chapter_xml() {
        let input = b"<ChapterAtom>\n  <ChapterTimeStart>00:00:50.000000000</ChapterTimeStart>\n</ChapterAtom>\n";
        let (out, stats) = rewrite_bytes(input);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<ChapterAtom>\n  <ChapterTimeStart>00:00:52.083333333</ChapterTimeStart>\n</ChapterAtom>\n"
        );
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.rewritten, 1);
    }

    #[test]
    fn multiple_timecodes_on_one_line() {
        let (out, stats) = rewrite_bytes(b"00:00:24.0 --> 00:00:48.0\n");
        assert_eq!(out, b"00:00:25.000000000 --> 00:00:50.000000000\n");
        assert_eq!(stats.rewritten, 2);
    }

    #[test]
    fn text_without_timecodes_is_byte_identical() {
        let input = "<?xml version=\"1.0\"?>\r\n<!-- café 12:30 -->\r\nno newline at end".as_bytes();
        let (out, stats) = rewrite_bytes(input);
        assert_eq!(out, input);
        assert_eq!(stats.rewritten, 0);
        assert_eq!(stats.lines, 3);
    }

    #[test]
    fn crlf_line_endings_are_preserved() {
        let (out, _) = rewrite_bytes(b"a 00:00:24.000\r\nb\r\n");
        assert_eq!(out, b"a 00:00:25.000000000\r\nb\r\n");
    }

    #[test]
    fn comma_timecodes_are_left_alone() {
        let input = b"00:00:24,000 --> 00:00:26,000\n";
        let (out, stats) = rewrite_bytes(input);
        assert_eq!(out, input);
        assert_eq!(stats.rewritten, 0);
    }

    #[test]
    fn non_utf8_bytes_pass_through() {
        let input = b"\xff\xfe 00:00:24.5 \xff\n";
        let (out, _) = rewrite_bytes(input);
        assert_eq!(out, b"\xff\xfe 00:00:25.520833333 \xff\n");
    }

    #[test]
    fn rewrite_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("old.xml");
        let dst = dir.path().join("new.xml");
        fs::write(&src, "<ChapterTimeStart>00:57:36.000000000</ChapterTimeStart>\n").unwrap();

        let stats = rewriter().rewrite_file(&src, &dst).unwrap();
        assert_eq!(stats.rewritten, 1);
        assert_eq!(
            fs::read_to_string(&dst).unwrap(),
            "<ChapterTimeStart>01:00:00.000000000</ChapterTimeStart>\n"
        );
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = rewriter().rewrite_file(&dir.path().join("missing.xml"), &dir.path().join("out.xml"));
        assert!(result.is_err());
    }
}
