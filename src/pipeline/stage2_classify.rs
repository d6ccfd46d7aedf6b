use serde::Serialize;

use crate::model::calls::{Call, Category, CategoryCount, Tier};
use crate::model::config::BreakpointConfig;
use crate::model::measurement::PairCounts;
use crate::model::ordinal::Ordinal;

/// Candidate DIA thresholds. The scanner only builds pairs with `low < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DiaBreakpoints {
    pub low: Ordinal,
    pub high: Ordinal,
}

impl DiaBreakpoints {
    pub fn new(low: Ordinal, high: Ordinal) -> Self {
        Self { low, high }
    }

    /// `None` unless both values are numbers and `low < high`.
    pub fn ordered(low: f64, high: f64) -> Option<Self> {
        let (low, high) = (Ordinal::new(low)?, Ordinal::new(high)?);
        (low < high).then(|| Self::new(low, high))
    }

    pub fn range(&self) -> f64 {
        self.high.get() - self.low.get()
    }
}

/// MIC call and weight tier. Values on `mic_low` are R, values on `mic_high` are S.
pub fn classify_mic(value: f64, config: &BreakpointConfig) -> (Call, Tier) {
    let mic_range = config.mic_range();
    if value >= config.mic_high {
        let tier = if value >= config.mic_high + mic_range {
            Tier::Far
        } else {
            Tier::Near
        };
        (Call::Susceptible, tier)
    } else if value > config.mic_low && value < config.mic_high {
        (Call::Intermediate, Tier::Near)
    } else if value <= config.mic_low {
        let tier = if value <= config.mic_low - mic_range {
            Tier::Far
        } else {
            Tier::Near
        };
        (Call::Resistant, tier)
    } else {
        (Call::Unclassifiable, Tier::Near)
    }
}

/// DIA call against a candidate pair. Values on `low` are S, values on `high` are R.
pub fn classify_dia(value: f64, candidate: DiaBreakpoints) -> Call {
    let (low, high) = (candidate.low.get(), candidate.high.get());
    if value <= low {
        Call::Susceptible
    } else if value > low && value < high {
        Call::Intermediate
    } else if value >= high {
        Call::Resistant
    } else {
        Call::Unclassifiable
    }
}

pub fn categorize(
    mic: f64,
    dia: f64,
    config: &BreakpointConfig,
    candidate: DiaBreakpoints,
) -> Category {
    let (mic_call, tier) = classify_mic(mic, config);
    Category::new(mic_call, classify_dia(dia, candidate), tier)
}

/// Partitions every distinct pair into its category; the result sums to the table total.
pub fn classify_candidate(
    pairs: &PairCounts,
    config: &BreakpointConfig,
    candidate: DiaBreakpoints,
) -> CategoryCount {
    let mut counts = CategoryCount::default();
    for (pair, count) in pairs {
        counts.add(
            categorize(pair.mic.get(), pair.dia.get(), config, candidate),
            *count,
        );
    }
    counts
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_classify.rs"]
mod tests;
