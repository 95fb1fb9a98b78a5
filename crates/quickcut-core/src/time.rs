//! Time representation for clip arrangement
//!
//! Positions and durations are seconds, stored as rational numbers so that
//! repeated shifting and splitting never accumulates floating-point error.
//! Pixel values are converted to and from `Seconds` only at the coordinate
//! mapper boundary.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A point in time or a duration, in seconds.
/// Uses rational arithmetic to stay exact under repeated edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seconds {
    /// Value as a rational number (seconds)
    value: Rational64,
}

impl Seconds {
    /// Create a new value of `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Const constructor for compile-time constants.
    /// The fraction is stored as given, without reduction.
    #[inline]
    pub const fn from_raw(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new_raw(numerator, denominator),
        }
    }

    /// Create from a float of seconds.
    /// Note: May introduce small precision errors.
    pub fn from_f64(seconds: f64) -> Self {
        // High fixed denominator for reasonable precision
        const PRECISION: i64 = 1_000_000;
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Zero seconds constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this value is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        if *self.value.numer() < 0 {
            Self { value: -self.value }
        } else {
            self
        }
    }

    /// The smaller of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// The larger of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Seconds {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for Seconds {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl Neg for Seconds {
    type Output = Self;
    fn neg(self) -> Self {
        Self { value: -self.value }
    }
}

impl Mul<i64> for Seconds {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self {
            value: self.value * rhs,
        }
    }
}

impl Div<i64> for Seconds {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self {
            value: self.value / rhs,
        }
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_f64())
    }
}

/// A time interval with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start time (inclusive)
    pub start: Seconds,
    /// Duration of the span
    pub duration: Seconds,
}

impl TimeSpan {
    /// Create a new span from start and duration.
    #[inline]
    pub fn new(start: Seconds, duration: Seconds) -> Self {
        Self { start, duration }
    }

    /// Create a span from start and end times.
    #[inline]
    pub fn from_start_end(start: Seconds, end: Seconds) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> Seconds {
        self.start + self.duration
    }

    /// Check if a time lies within this span.
    #[inline]
    pub fn contains(self, time: Seconds) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if two spans overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Compute the intersection of two spans, if any.
    pub fn intersection(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        Some(Self::from_start_end(start, end))
    }

    /// Empty span starting at zero.
    pub const EMPTY: Self = Self {
        start: Seconds::ZERO,
        duration: Seconds::ZERO,
    };
}

impl Default for TimeSpan {
    fn default() -> Self {
        Self::EMPTY
    }
}
