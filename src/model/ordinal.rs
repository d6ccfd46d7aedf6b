use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Ordinal axis value. Integer dilution codes and floating-point (log2) concentrations
/// share this representation; NaN is never stored, so the total order is consistent
/// with the numeric one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Ordinal(f64);

impl Ordinal {
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        // -0.0 and 0.0 must collide as map keys
        if value == 0.0 {
            return Some(Self(0.0));
        }
        Some(Self(value))
    }

    pub fn from_int(value: i64) -> Self {
        Self::new(value as f64).unwrap_or(Self(0.0))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_integral(self) -> bool {
        self.0.is_finite() && self.0.fract() == 0.0
    }
}

impl PartialEq for Ordinal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ordinal {}

impl PartialOrd for Ordinal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ordinal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Ordinal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for Ordinal {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Ordinal::new(value).ok_or_else(|| "ordinal value must not be NaN".to_string())
    }
}

impl From<Ordinal> for f64 {
    fn from(value: Ordinal) -> Self {
        value.0
    }
}

impl From<i32> for Ordinal {
    fn from(value: i32) -> Self {
        Self::from_int(i64::from(value))
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/ordinal.rs"]
mod tests;
