//! Re-encode stage: slows the audio down and stream-copies everything else

use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::domain::factor::CorrectionFactor;
use crate::error::{PalFixError, PalFixResult};
use crate::ports::{Tool, ToolRunner};
use crate::probe::inspector::ContainerInspector;
use crate::probe::report::SampleRate;

/// `asetrate` expression reinterpreting audio at `rate * (1 / factor)`
pub fn asetrate_filter(rate: &SampleRate, factor: CorrectionFactor) -> String {
    format!("asetrate={}*{}", rate, factor.recip())
}

/// Build the transcoder command line
///
/// Video and subtitles are copied; interleaving delta is zero so the muxer
/// does not buffer audio far ahead of video.
pub fn transcode_args(input: &Path, output: &Path, audio_filter: Option<&str>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        input.as_os_str().to_os_string(),
        "-map".into(),
        "0".into(),
    ];

    if let Some(filter) = audio_filter {
        args.push("-filter:a".into());
        args.push(filter.into());
    }

    args.extend(
        ["-c:v", "copy", "-c:s", "copy", "-max_interleave_delta", "0"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(output.as_os_str().to_os_string());
    args
}

/// Result of the re-encode stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResampleOutcome {
    /// Source rate the filter was computed from, if audio was present
    pub sample_rate: Option<SampleRate>,
    /// The filter expression handed to the transcoder
    pub audio_filter: Option<String>,
}

/// Drives the transcoder over the intermediate container
///
/// Only the first audio track's sampling frequency is used; every audio
/// track gets the same filter.
pub struct AudioResampler<'a> {
    runner: &'a dyn ToolRunner,
    factor: CorrectionFactor,
}

impl<'a> AudioResampler<'a> {
    pub fn new(runner: &'a dyn ToolRunner, factor: CorrectionFactor) -> Self {
        Self { runner, factor }
    }

    /// Write the final output; `has_audio` comes from the track classification
    pub fn resample(&self, intermediate: &Path, output: &Path, has_audio: bool) -> PalFixResult<ResampleOutcome> {
        let started = Instant::now();

        let sample_rate = if has_audio {
            let rate = ContainerInspector::new(self.runner)
                .sampling_frequency(intermediate)?
                .ok_or_else(|| PalFixError::ReportUnparseable {
                    tool: Tool::Mkvinfo,
                    message: "audio tracks present but no sampling frequency reported".to_string(),
                })?;
            Some(rate)
        } else {
            warn!("No audio tracks, copying streams without resampling");
            None
        };

        let audio_filter = sample_rate
            .as_ref()
            .map(|rate| asetrate_filter(rate, self.factor));
        if let Some(filter) = &audio_filter {
            info!("Audio filter: {}", filter);
        }

        info!("Transcoding {} -> {}", intermediate.display(), output.display());
        self.runner.run_checked(
            Tool::Ffmpeg,
            &transcode_args(intermediate, output, audio_filter.as_deref()),
        )?;

        info!("Transcode finished in {:.1}s", started.elapsed().as_secs_f64());
        Ok(ResampleOutcome {
            sample_rate,
            audio_filter,
        })
    }
}
