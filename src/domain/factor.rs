//! Exact rational correction factor.
//!
//! The factor is parsed once per run and threaded through every component
//! that does timing math. Audio uses its reciprocal.

use std::fmt;
use std::str::FromStr;

use crate::error::{PalFixError, PalFixResult};

/// A positive rational number in lowest terms.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrectionFactor {
    num: i64,
    den: i64,
}

impl CorrectionFactor {
    /// The usual 24 fps film to 25 fps PAL speedup, undone.
    pub const PAL: Self = Self { num: 25, den: 24 };

    /// Create a new factor, reduced to lowest terms.
    pub fn new(num: i64, den: i64) -> PalFixResult<Self> {
        if den == 0 {
            return Err(PalFixError::InvalidFactor {
                value: format!("{}/{}", num, den),
                reason: "denominator cannot be zero".to_string(),
            });
        }
        if num == 0 || (num < 0) != (den < 0) {
            return Err(PalFixError::InvalidFactor {
                value: format!("{}/{}", num, den),
                reason: "factor must be positive".to_string(),
            });
        }

        let (num, den) = match (num.checked_abs(), den.checked_abs()) {
            (Some(num), Some(den)) => (num, den),
            _ => {
                return Err(PalFixError::InvalidFactor {
                    value: format!("{}/{}", num, den),
                    reason: "value out of range".to_string(),
                })
            }
        };
        let g = gcd(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Numerator in lowest terms
    pub fn numer(&self) -> i64 {
        self.num
    }

    /// Denominator in lowest terms
    pub fn denom(&self) -> i64 {
        self.den
    }

    /// The multiplicative inverse, applied to audio sample rates.
    pub fn recip(&self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }

    /// Convert to f64 for display purposes only.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for CorrectionFactor {
    fn default() -> Self {
        Self::PAL
    }
}

impl fmt::Debug for CorrectionFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrectionFactor({}/{})", self.num, self.den)
    }
}

impl fmt::Display for CorrectionFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for CorrectionFactor {
    type Err = PalFixError;

    /// Parse `N/D` or a bare integer `N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |reason: &str| PalFixError::InvalidFactor {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (num, den) = match trimmed.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (trimmed, "1"),
        };

        let num = num
            .parse::<i64>()
            .map_err(|_| invalid("numerator is not an integer"))?;
        let den = den
            .parse::<i64>()
            .map_err(|_| invalid("denominator is not an integer"))?;

        Self::new(num, den).map_err(|e| match e {
            PalFixError::InvalidFactor { reason, .. } => invalid(&reason),
            other => other,
        })
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
