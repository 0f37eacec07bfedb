//! Parsers for the human-readable reports of the MKVToolNix programs
//!
//! These reports are not a stable interface. Everything that depends on their
//! shape lives here, and anything unrecognized is a `ReportUnparseable` error.

use std::fmt;

use regex::Regex;

use crate::domain::model::{Track, TrackKind, TrackReport};
use crate::error::{PalFixError, PalFixResult};
use crate::ports::Tool;

const TRACK_MARKER: &str = "track id";
const CHAPTERS_MARKER: &str = "chapters";
const AUDIO_MARKER: &str = "audio";

/// Sampling frequency exactly as printed by the inspector, e.g. `48000`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRate(String);

impl SampleRate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns report text into typed results
pub struct ReportParser {
    track_id: Regex,
    sampling_frequency: Regex,
    number: Regex,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser {
    pub fn new() -> Self {
        Self {
            track_id: Regex::new(r"(\d+):").expect("track id pattern is valid"),
            sampling_frequency: Regex::new(r"(?i)sampling frequency")
                .expect("sampling frequency pattern is valid"),
            number: Regex::new(r"\d+\.?\d*").expect("number pattern is valid"),
        }
    }

    /// Parse `mkvmerge -i` output into tracks and chapter presence
    ///
    /// ```text
    /// File 'movie.mkv': container: Matroska
    /// Track ID 0: video (AVC/H.264/MPEG-4p10)
    /// Track ID 1: audio (AC-3)
    /// Chapters: 12 entries
    /// ```
    pub fn parse_identification(&self, report: &str) -> PalFixResult<TrackReport> {
        let mut tracks = Vec::new();

        for line in report.lines() {
            // `Tags for track ID n` lines also mention the marker
            if !line.trim_start().to_lowercase().starts_with(TRACK_MARKER) {
                continue;
            }
            tracks.push(self.parse_track_line(line)?);
        }

        if tracks.is_empty() {
            return Err(PalFixError::ReportUnparseable {
                tool: Tool::Mkvmerge,
                message: "no tracks listed in identification report".to_string(),
            });
        }

        Ok(TrackReport {
            tracks,
            has_chapters: report.to_lowercase().contains(CHAPTERS_MARKER),
        })
    }

    fn parse_track_line(&self, line: &str) -> PalFixResult<Track> {
        let caps = self
            .track_id
            .captures(line)
            .ok_or_else(|| PalFixError::ReportUnparseable {
                tool: Tool::Mkvmerge,
                message: format!("track line without an ID: {}", line.trim()),
            })?;

        let id = caps[1]
            .parse::<u32>()
            .map_err(|e| PalFixError::ReportUnparseable {
                tool: Tool::Mkvmerge,
                message: format!("bad track ID in '{}': {}", line.trim(), e),
            })?;

        let descriptor = line[caps.get(0).map_or(line.len(), |m| m.end())..].trim();
        let kind = if descriptor.to_lowercase().contains(AUDIO_MARKER) {
            TrackKind::Audio
        } else {
            TrackKind::NonAudio
        };

        Ok(Track::new(id, kind, descriptor))
    }

    /// First sampling frequency in an `mkvinfo` dump
    ///
    /// Only the first audio track (and its first channel) is considered.
    pub fn parse_sampling_frequency(&self, report: &str) -> PalFixResult<Option<SampleRate>> {
        let (line, label) = match report
            .lines()
            .find_map(|l| self.sampling_frequency.find(l).map(|m| (l, m)))
        {
            Some(found) => found,
            None => return Ok(None),
        };

        // Skip the label so digits in it never count
        let label_end = label.end();

        self.number
            .find(&line[label_end..])
            .map(|m| Some(SampleRate(m.as_str().to_string())))
            .ok_or_else(|| PalFixError::ReportUnparseable {
                tool: Tool::Mkvinfo,
                message: format!("sampling frequency without a value: {}", line.trim()),
            })
    }
}
