//! Durations and their arithmetic.
//!
//! Durations never take part in casts. The only way to obtain a plain float
//! from them is dividing one duration by another.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClassicalError, ClassicalResult};

/// Unit attached to a duration literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Backend-dependent sample time.
    Dt,
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    /// Parse a literal suffix; both `us` and `µs` are accepted.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "dt" => Some(TimeUnit::Dt),
            "ns" => Some(TimeUnit::Ns),
            "us" | "µs" | "μs" => Some(TimeUnit::Us),
            "ms" => Some(TimeUnit::Ms),
            "s" => Some(TimeUnit::S),
            _ => None,
        }
    }

    /// Seconds per unit. `dt` has no fixed SI length.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            TimeUnit::Dt => None,
            TimeUnit::Ns => Some(1e-9),
            TimeUnit::Us => Some(1e-6),
            TimeUnit::Ms => Some(1e-3),
            TimeUnit::S => Some(1.0),
        }
    }

    /// Canonical literal suffix.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Dt => "dt",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }
}

/// A duration magnitude with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    magnitude: f64,
    unit: TimeUnit,
}

impl Duration {
    /// Create a duration.
    pub fn new(magnitude: f64, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Length in seconds, or `None` for `dt` durations.
    pub fn to_seconds(&self) -> Option<f64> {
        self.unit.seconds().map(|s| self.magnitude * s)
    }

    /// Express `other` in this duration's unit.
    fn magnitude_of(&self, other: &Duration) -> ClassicalResult<f64> {
        if self.unit == other.unit {
            return Ok(other.magnitude);
        }
        match (self.unit.seconds(), other.unit.seconds()) {
            (Some(mine), Some(theirs)) => Ok(other.magnitude * theirs / mine),
            _ => Err(ClassicalError::DurationUnitMismatch {
                left: self.unit.suffix().to_string(),
                right: other.unit.suffix().to_string(),
            }),
        }
    }

    /// Sum, in the unit of `self`.
    pub fn add(&self, other: &Duration) -> ClassicalResult<Duration> {
        Ok(Duration::new(self.magnitude + self.magnitude_of(other)?, self.unit))
    }

    /// Difference, in the unit of `self`.
    pub fn sub(&self, other: &Duration) -> ClassicalResult<Duration> {
        Ok(Duration::new(self.magnitude - self.magnitude_of(other)?, self.unit))
    }

    /// Multiply by a dimensionless factor.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Duration {
        Duration::new(self.magnitude * factor, self.unit)
    }

    /// `duration / duration`, the only route from a duration to a float.
    pub fn ratio(&self, other: &Duration) -> ClassicalResult<f64> {
        let denominator = self.magnitude_of(other)?;
        if denominator == 0.0 {
            return Err(ClassicalError::DivisionByZero);
        }
        Ok(self.magnitude / denominator)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}
