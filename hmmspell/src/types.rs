//! Shared numeric types.
use std::{
    fmt::Display,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

/// A score expressed as a negative natural logarithm of a probability.
///
/// Lower is better: a weight of zero is a certain event, an infinite weight
/// an impossible one. Multiplying probabilities becomes adding weights, which
/// keeps long products from underflowing to zero while preserving their order.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Weight(pub f64);

impl Weight {
    /// Weight of a certain event.
    pub const ZERO: Self = Weight(0.0);
    /// Weight of an impossible event.
    pub const INFINITE: Self = Weight(f64::INFINITY);

    /// Converts a probability in `[0, 1]` into a weight.
    pub fn from_probability(probability: f64) -> Weight {
        // `0.0 -` keeps a certain event at +0.0 instead of -0.0
        Weight(0.0 - probability.ln())
    }

    /// Converts the weight back into a probability. Very large weights
    /// come back as `0.0`.
    pub fn probability(self) -> f64 {
        (-self.0).exp()
    }

    /// Whether this weight stands for an impossible event.
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Weight {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Weight(self.0 + rhs.0)
    }
}

impl AddAssign for Weight {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
