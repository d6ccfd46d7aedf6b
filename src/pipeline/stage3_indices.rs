use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::model::calls::{Call, CategoryCount};
use crate::model::config::{BreakpointConfig, ErrorWeights};
use crate::pipeline::stage2_classify::DiaBreakpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denominator {
    Total,
    SusceptibleTotal,
    ResistantTotal,
    Range,
}

impl fmt::Display for Denominator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Denominator::Total => "total measurements",
            Denominator::SusceptibleTotal => "MIC-susceptible total",
            Denominator::ResistantTotal => "MIC-resistant total",
            Denominator::Range => "DIA breakpoint range",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum IndexError {
    #[error("zero denominator: {0}")]
    ZeroDenominator(Denominator),
}

pub type IndexValue = Result<f64, IndexError>;

/// Error counts and totals for one candidate, reduced from a `CategoryCount`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ErrorTally {
    pub susceptible: u64,
    pub intermediate: u64,
    pub resistant: u64,
    pub unclassifiable: u64,
    pub total: u64,
    pub minor_error: u64,
    pub major_error: u64,
    pub very_major_error: u64,
    pub dbets: f64,
}

impl ErrorTally {
    pub fn from_counts(counts: &CategoryCount, weights: &ErrorWeights) -> Self {
        let mut t = ErrorTally::default();
        for (category, &count) in counts.iter() {
            let w = weights.for_tier(category.tier);
            let n = count as f64;
            t.total += count;
            match category.mic {
                Call::Susceptible => t.susceptible += count,
                Call::Intermediate => t.intermediate += count,
                Call::Resistant => t.resistant += count,
                Call::Unclassifiable => t.unclassifiable += count,
            }
            match (category.mic, category.dia) {
                (Call::Resistant, Call::Susceptible) => {
                    t.very_major_error += count;
                    t.dbets += w.very_major * n;
                }
                (Call::Susceptible, Call::Resistant) => {
                    t.major_error += count;
                    t.dbets += w.major * n;
                }
                (Call::Resistant | Call::Susceptible, Call::Intermediate)
                | (
                    Call::Intermediate,
                    Call::Susceptible | Call::Intermediate | Call::Resistant,
                ) => {
                    t.minor_error += count;
                    t.dbets += w.minor * n;
                }
                _ => {}
            }
        }
        t
    }

    pub fn all_errors(&self) -> u64 {
        self.minor_error + self.major_error + self.very_major_error
    }

    fn error_fraction(&self, errors: f64) -> IndexValue {
        if self.total == 0 {
            return Err(IndexError::ZeroDenominator(Denominator::Total));
        }
        Ok(errors / self.total as f64)
    }

    /// `1 / (range / error_fraction)`, written as `error_fraction / range`.
    pub fn bzk(&self, candidate: DiaBreakpoints) -> IndexValue {
        let frac = self.error_fraction(self.all_errors() as f64)?;
        per_range(frac, candidate)
    }

    pub fn bzk_weighted(&self, candidate: DiaBreakpoints, alpha: f64) -> IndexValue {
        let weighted = self.minor_error as f64 * (1.0 - alpha)
            + (self.major_error + self.very_major_error) as f64 * alpha;
        let frac = self.error_fraction(weighted)?;
        per_range(frac, candidate)
    }

    /// False-susceptible rate: very-major errors over MIC-resistant isolates.
    pub fn false_susceptible(&self) -> IndexValue {
        if self.resistant == 0 {
            return Err(IndexError::ZeroDenominator(Denominator::ResistantTotal));
        }
        Ok(self.very_major_error as f64 / self.resistant as f64)
    }

    /// False-resistant rate: major errors over MIC-susceptible isolates.
    pub fn false_resistant(&self) -> IndexValue {
        if self.susceptible == 0 {
            return Err(IndexError::ZeroDenominator(Denominator::SusceptibleTotal));
        }
        Ok(self.major_error as f64 / self.susceptible as f64)
    }

    pub fn max_err(&self) -> IndexValue {
        let fs = self.false_susceptible()?;
        let fr = self.false_resistant()?;
        let minor = self.error_fraction(self.minor_error as f64)?;
        Ok(fs.max(fr) + minor * minor)
    }
}

fn per_range(frac: f64, candidate: DiaBreakpoints) -> IndexValue {
    let range = candidate.range();
    if range <= 0.0 || !range.is_finite() {
        return Err(IndexError::ZeroDenominator(Denominator::Range));
    }
    Ok(frac / range)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexResult {
    pub candidate: DiaBreakpoints,
    #[serde(flatten)]
    pub tally: ErrorTally,
    #[serde(serialize_with = "serialize_index_value")]
    pub bzk: IndexValue,
    #[serde(serialize_with = "serialize_index_value")]
    pub bzk_weighted: IndexValue,
    #[serde(serialize_with = "serialize_index_value")]
    pub fs: IndexValue,
    #[serde(serialize_with = "serialize_index_value")]
    pub fr: IndexValue,
    #[serde(serialize_with = "serialize_index_value")]
    pub max_err: IndexValue,
}

pub fn compute_indices(
    counts: &CategoryCount,
    candidate: DiaBreakpoints,
    config: &BreakpointConfig,
) -> IndexResult {
    let tally = ErrorTally::from_counts(counts, &config.weights);
    IndexResult {
        candidate,
        tally,
        bzk: tally.bzk(candidate),
        bzk_weighted: tally.bzk_weighted(candidate, config.bzk_alpha),
        fs: tally.false_susceptible(),
        fr: tally.false_resistant(),
        max_err: tally.max_err(),
    }
}

/// Defined values as numbers, undefined ones as their reason string.
pub fn serialize_index_value<S: Serializer>(value: &IndexValue, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Ok(v) => s.serialize_f64(*v),
        Err(e) => s.serialize_str(&e.to_string()),
    }
}

pub fn format_index_value(value: &IndexValue) -> String {
    match value {
        Ok(v) => format!("{v:.6}"),
        Err(_) => "NA".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_indices.rs"]
mod tests;
