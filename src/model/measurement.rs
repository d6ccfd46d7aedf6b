use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::model::ordinal::Ordinal;

/// Largest number of values an integer span may expand to.
pub const MAX_INTEGER_SPAN: u64 = 1024;

/// One observed (MIC, DIA) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MeasurementPair {
    pub mic: Ordinal,
    pub dia: Ordinal,
}

impl MeasurementPair {
    pub fn new(mic: Ordinal, dia: Ordinal) -> Self {
        Self { mic, dia }
    }
}

pub type PairCounts = BTreeMap<MeasurementPair, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Mic,
    Dia,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Mic => "MIC",
            Axis::Dia => "DIA",
        }
    }
}

/// Integer span too wide to enumerate; `len` is `None` when it overflows `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{} integer span {min}..={max} exceeds {limit} values", .axis.as_str())]
pub struct SpanTooWide {
    pub axis: Axis,
    pub min: Ordinal,
    pub max: Ordinal,
    pub len: Option<u64>,
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateMode {
    /// Distinct values present in the data.
    #[default]
    Observed,
    /// Every integer between the observed minimum and maximum, inclusive.
    IntegerRange,
}

impl CandidateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateMode::Observed => "observed",
            CandidateMode::IntegerRange => "integer_range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub mic_min: Ordinal,
    pub mic_max: Ordinal,
    pub dia_min: Ordinal,
    pub dia_max: Ordinal,
}

/// Multiset of observed measurement pairs. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    pair_counts: PairCounts,
    mic_axis: BTreeSet<Ordinal>,
    dia_axis: BTreeSet<Ordinal>,
    total: u64,
}

impl MeasurementSet {
    /// One observation per item.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = MeasurementPair>,
    {
        Self::from_counts(pairs.into_iter().map(|p| (p, 1)))
    }

    /// Pre-aggregated counts; repeated keys are summed and zero counts dropped.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (MeasurementPair, u64)>,
    {
        let mut set = Self::default();
        for (pair, count) in counts {
            if count == 0 {
                continue;
            }
            *set.pair_counts.entry(pair).or_insert(0) += count;
            set.mic_axis.insert(pair.mic);
            set.dia_axis.insert(pair.dia);
            set.total += count;
        }
        set
    }

    pub fn pair_counts(&self) -> &PairCounts {
        &self.pair_counts
    }

    pub fn mic_axis(&self) -> &BTreeSet<Ordinal> {
        &self.mic_axis
    }

    pub fn dia_axis(&self) -> &BTreeSet<Ordinal> {
        &self.dia_axis
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct_pairs(&self) -> usize {
        self.pair_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pair_counts.is_empty()
    }

    pub fn count(&self, mic: Ordinal, dia: Ordinal) -> u64 {
        self.pair_counts
            .get(&MeasurementPair::new(mic, dia))
            .copied()
            .unwrap_or(0)
    }

    pub fn bounds(&self) -> Option<AxisBounds> {
        Some(AxisBounds {
            mic_min: *self.mic_axis.first()?,
            mic_max: *self.mic_axis.last()?,
            dia_min: *self.dia_axis.first()?,
            dia_max: *self.dia_axis.last()?,
        })
    }

    /// Sorted axis values for scanning or rendering. Integer spans wider than
    /// [`MAX_INTEGER_SPAN`] are refused.
    pub fn axis_values(
        &self,
        axis: Axis,
        mode: CandidateMode,
    ) -> Result<Vec<Ordinal>, SpanTooWide> {
        let values = self.axis(axis);
        match mode {
            CandidateMode::Observed => Ok(self.observed_values(axis)),
            CandidateMode::IntegerRange => {
                let (Some(&min), Some(&max)) = (values.first(), values.last()) else {
                    return Ok(Vec::new());
                };
                match integer_span_len(min, max) {
                    Some(n) if n <= MAX_INTEGER_SPAN => {
                        // in range: integer_span_len checked both ends
                        let start = min.get().ceil() as i64;
                        Ok((0..n as i64).map(|k| Ordinal::from_int(start + k)).collect())
                    }
                    len => Err(SpanTooWide {
                        axis,
                        min,
                        max,
                        len,
                        limit: MAX_INTEGER_SPAN,
                    }),
                }
            }
        }
    }

    pub fn observed_values(&self, axis: Axis) -> Vec<Ordinal> {
        self.axis(axis).iter().copied().collect()
    }

    /// Number of integers between the axis minimum and maximum, inclusive; `None` when
    /// the axis is empty or the count does not fit in `u64`.
    pub fn integer_span_len(&self, axis: Axis) -> Option<u64> {
        let values = self.axis(axis);
        integer_span_len(*values.first()?, *values.last()?)
    }

    fn axis(&self, axis: Axis) -> &BTreeSet<Ordinal> {
        match axis {
            Axis::Mic => &self.mic_axis,
            Axis::Dia => &self.dia_axis,
        }
    }
}

// 2^63; `as i64` saturates at and past it
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn to_i64(value: f64) -> Option<i64> {
    (value.is_finite() && (-I64_LIMIT..I64_LIMIT).contains(&value)).then_some(value as i64)
}

fn integer_span_len(min: Ordinal, max: Ordinal) -> Option<u64> {
    let start = to_i64(min.get().ceil())?;
    let end = to_i64(max.get().floor())?;
    if end < start {
        return Some(0);
    }
    let len = i128::from(end)
        .checked_sub(i128::from(start))?
        .checked_add(1)?;
    u64::try_from(len).ok()
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/measurement.rs"]
mod tests;
