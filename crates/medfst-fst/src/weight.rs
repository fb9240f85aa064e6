// Tropical semiring weights.

use std::fmt;

/// Comparison tolerance for weights, also the quantization step of
/// [`TropicalWeight::quantize`].
pub const DELTA: f32 = 1.0 / 1024.0;

/// A weight in the tropical `(min, +)` semiring.
///
/// `plus` keeps the smaller weight, `times` adds. [`TropicalWeight::ZERO`]
/// (positive infinity) is the weight of an impossible path and
/// [`TropicalWeight::ONE`] (0.0) the weight of a free one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TropicalWeight(f32);

impl TropicalWeight {
    pub const ZERO: Self = Self(f32::INFINITY);
    pub const ONE: Self = Self(0.0);

    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == f32::INFINITY
    }

    /// Semiring addition: the minimum.
    #[inline]
    pub fn plus(self, other: Self) -> Self {
        if other.0 < self.0 { other } else { self }
    }

    /// Semiring multiplication: the sum.
    #[inline]
    pub fn times(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            Self::ZERO
        } else {
            Self(self.0 + other.0)
        }
    }

    /// Left division: the `x` with `other.times(x) == self`.
    ///
    /// Dividing by [`TropicalWeight::ZERO`] is undefined and yields `ZERO`.
    #[inline]
    pub fn divide(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }

    #[inline]
    pub fn approx_eq(self, other: Self, delta: f32) -> bool {
        if self.is_zero() || other.is_zero() {
            return self.is_zero() == other.is_zero();
        }
        (self.0 - other.0).abs() <= delta
    }

    /// Integer key used when weights take part in hashing or equality of
    /// state signatures.
    #[inline]
    pub fn quantize(self) -> i64 {
        if self.is_zero() {
            i64::MAX
        } else {
            (self.0 / DELTA).round() as i64
        }
    }
}

impl Default for TropicalWeight {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<f32> for TropicalWeight {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl fmt::Display for TropicalWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("Infinity")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
