//! Timecode parsing, rescaling and formatting.
//!
//! Timecodes look like `HH:MM:SS.fffffffff`. All arithmetic is done on exact
//! rationals; the only rounding happens when the result is rendered at
//! nanosecond precision.

use std::fmt;

use crate::domain::factor::CorrectionFactor;

/// Digits kept after the decimal point when rendering.
pub const OUTPUT_FRACTION_DIGITS: usize = 9;

/// Input digits beyond this are dropped; they cannot affect a 9-digit result.
const MAX_INPUT_FRACTION_DIGITS: u32 = 18;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Reasons a timecode string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// Not `HH:MM:SS.f+`
    Malformed(String),
    /// Value too large to scale exactly
    Overflow,
}

impl fmt::Display for TimecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimecodeError::Malformed(text) => write!(f, "malformed timecode: {}", text),
            TimecodeError::Overflow => write!(f, "timecode out of range"),
        }
    }
}

impl std::error::Error for TimecodeError {}

/// Elapsed time held as an exact fraction of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    num: u128,
    den: u128,
}

impl Timecode {
    /// Parse `H+:M+:S+.F+`. Field widths are not enforced on input.
    pub fn parse(text: &str) -> Result<Self, TimecodeError> {
        let malformed = || TimecodeError::Malformed(text.to_string());

        let mut fields = text.split(':');
        let (hours, minutes, seconds) = match (fields.next(), fields.next(), fields.next()) {
            (Some(h), Some(m), Some(s)) if fields.next().is_none() => (h, m, s),
            _ => return Err(malformed()),
        };
        let (whole, fraction) = seconds.split_once('.').ok_or_else(malformed)?;

        for field in [hours, minutes, whole, fraction] {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
        }

        let hours: u128 = hours.parse().map_err(|_| TimecodeError::Overflow)?;
        let minutes: u128 = minutes.parse().map_err(|_| TimecodeError::Overflow)?;
        let whole: u128 = whole.parse().map_err(|_| TimecodeError::Overflow)?;

        let kept = &fraction[..fraction.len().min(MAX_INPUT_FRACTION_DIGITS as usize)];
        let scale = 10u128.pow(kept.len() as u32);
        let fraction: u128 = kept.parse().map_err(|_| TimecodeError::Overflow)?;

        let whole_seconds = hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(whole))
            .ok_or(TimecodeError::Overflow)?;
        let num = whole_seconds
            .checked_mul(scale)
            .and_then(|n| n.checked_add(fraction))
            .ok_or(TimecodeError::Overflow)?;

        Ok(Self { num, den: scale })
    }

    /// Multiply the elapsed time by `factor`.
    pub fn scale(&self, factor: CorrectionFactor) -> Result<Self, TimecodeError> {
        let num = self
            .num
            .checked_mul(factor.numer() as u128)
            .ok_or(TimecodeError::Overflow)?;
        let den = self
            .den
            .checked_mul(factor.denom() as u128)
            .ok_or(TimecodeError::Overflow)?;
        Ok(Self { num, den })
    }

    /// Total elapsed time rounded half-up to whole nanoseconds.
    pub fn as_nanos(&self) -> Result<u128, TimecodeError> {
        let scaled = self
            .num
            .checked_mul(NANOS_PER_SECOND)
            .and_then(|n| n.checked_add(self.den / 2))
            .ok_or(TimecodeError::Overflow)?;
        Ok(scaled / self.den)
    }

    /// Render as `HH:MM:SS.nnnnnnnnn` with minutes and seconds below 60.
    pub fn render(&self) -> Result<String, TimecodeError> {
        let nanos = self.as_nanos()?;
        let hours = nanos / NANOS_PER_HOUR;
        let rem = nanos % NANOS_PER_HOUR;
        let minutes = rem / NANOS_PER_MINUTE;
        let rem = rem % NANOS_PER_MINUTE;
        let seconds = rem / NANOS_PER_SECOND;
        let fraction = rem % NANOS_PER_SECOND;

        Ok(format!(
            "{:02}:{:02}:{:02}.{:0width$}",
            hours,
            minutes,
            seconds,
            fraction,
            width = OUTPUT_FRACTION_DIGITS
        ))
    }
}

/// Rescale one timecode string by `factor`.
pub fn correct_timecode(text: &str, factor: CorrectionFactor) -> Result<String, TimecodeError> {
    Timecode::parse(text)?.scale(factor)?.render()
}
