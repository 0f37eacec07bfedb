// Domain models - Tracks, sync directives and the remux plan

use std::fmt;
use std::path::PathBuf;

use crate::domain::factor::CorrectionFactor;

/// Coarse track type; only audio needs a different correction mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    NonAudio,
}

/// One track as listed by the container inspector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Track ID as reported by the inspector
    pub id: u32,
    /// Audio or not
    pub kind: TrackKind,
    /// Type descriptor text, e.g. `video (AVC/H.264/MPEG-4p10)`
    pub descriptor: String,
}

impl Track {
    pub fn new(id: u32, kind: TrackKind, descriptor: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            descriptor: descriptor.into(),
        }
    }

    pub fn is_audio(&self) -> bool {
        self.kind == TrackKind::Audio
    }
}

/// Parsed result of identifying a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackReport {
    /// Tracks in the order the inspector listed them
    pub tracks: Vec<Track>,
    /// Whether the container carries a chapter list
    pub has_chapters: bool,
}

impl TrackReport {
    pub fn has_audio(&self) -> bool {
        self.audio_tracks().next().is_some()
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.is_audio())
    }

    pub fn non_audio_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| !t.is_audio())
    }
}

/// Re-time one track in place: start at offset 0 and run at `factor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncDirective {
    pub track_id: u32,
    pub factor: CorrectionFactor,
}

impl SyncDirective {
    pub fn new(track_id: u32, factor: CorrectionFactor) -> Self {
        Self { track_id, factor }
    }
}

/// Renders as mkvmerge's `--sync` value, `TID:0,N/D`
impl fmt::Display for SyncDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:0,{}", self.track_id, self.factor)
    }
}

/// Extracted chapter file and its re-timed counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRewrite {
    pub original: PathBuf,
    pub corrected: PathBuf,
}

/// Everything the remux stage needs to know
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// One directive per non-audio track, in report order
    pub directives: Vec<SyncDirective>,
    /// Present only when the input had chapters
    pub chapters: Option<ChapterRewrite>,
}

impl SyncPlan {
    /// Path of the chapter file that replaces the embedded chapters
    pub fn replacement_chapters(&self) -> Option<&PathBuf> {
        self.chapters.as_ref().map(|c| &c.corrected)
    }
}
