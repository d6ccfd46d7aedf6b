use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Susceptibility call from one of the two tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Call {
    Susceptible,
    Intermediate,
    Resistant,
    /// Value matched none of the three rules (NaN thresholds or values).
    Unclassifiable,
}

impl Call {
    pub fn as_str(&self) -> &'static str {
        match self {
            Call::Susceptible => "S",
            Call::Intermediate => "I",
            Call::Resistant => "R",
            Call::Unclassifiable => "ERR",
        }
    }
}

/// Error weight tier: `Far` when the MIC value lies deep inside its S or R zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Near,
    Far,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Near => "near",
            Tier::Far => "far",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Category {
    pub mic: Call,
    pub dia: Call,
    pub tier: Tier,
}

impl Category {
    pub fn new(mic: Call, dia: Call, tier: Tier) -> Self {
        Self { mic, dia, tier }
    }
}

/// Aggregated counts per category for one candidate DIA pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCount {
    counts: BTreeMap<Category, u64>,
}

impl CategoryCount {
    pub fn add(&mut self, category: Category, count: u64) {
        *self.counts.entry(category).or_insert(0) += count;
    }

    pub fn get(&self, category: Category) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &u64)> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(Category, u64)> for CategoryCount {
    fn from_iter<T: IntoIterator<Item = (Category, u64)>>(iter: T) -> Self {
        let mut out = CategoryCount::default();
        for (category, count) in iter {
            out.add(category, count);
        }
        out
    }
}
