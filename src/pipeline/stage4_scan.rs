use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::model::config::{BreakpointConfig, ConfigError};
use crate::model::measurement::{Axis, CandidateMode, MeasurementSet, SpanTooWide};
use crate::model::ordinal::Ordinal;
use crate::pipeline::stage2_classify::{DiaBreakpoints, classify_candidate};
use crate::pipeline::stage3_indices::{IndexError, IndexResult, compute_indices};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("candidate set too large: {0}")]
    CandidateSpan(#[from] SpanTooWide),
    #[error("scan cancelled after {evaluated} candidate pairs")]
    Cancelled { evaluated: usize },
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Index used as the ranking key. Lower is better for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    MaxErr,
    Dbets,
    Bzk,
    BzkWeighted,
}

impl RankBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankBy::MaxErr => "max_err",
            RankBy::Dbets => "dBETS",
            RankBy::Bzk => "BZK",
            RankBy::BzkWeighted => "BZK_weighted",
        }
    }

    fn score(&self, result: &IndexResult) -> Result<f64, IndexError> {
        match self {
            RankBy::MaxErr => result.max_err,
            RankBy::Dbets => Ok(result.tally.dbets),
            RankBy::Bzk => result.bzk,
            RankBy::BzkWeighted => result.bzk_weighted,
        }
    }
}

/// Ranking key, totally ordered.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedPair {
    pub dia_low: Ordinal,
    pub dia_high: Ordinal,
    pub fs: f64,
    pub fr: f64,
}

impl RankedPair {
    pub fn candidate(&self) -> DiaBreakpoints {
        DiaBreakpoints::new(self.dia_low, self.dia_high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExcludedPair {
    pub candidate: DiaBreakpoints,
    pub reason: IndexError,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub mode: CandidateMode,
    pub rank_by: RankBy,
    /// Worker threads for the `mt` feature; ignored otherwise.
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            mode: CandidateMode::Observed,
            rank_by: RankBy::MaxErr,
            threads: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Score to every pair achieving it, in scan order.
    pub ranking: BTreeMap<Score, Vec<RankedPair>>,
    pub excluded: Vec<ExcludedPair>,
    pub evaluated: usize,
}

impl ScanOutcome {
    pub fn best(&self) -> Option<(Score, &[RankedPair])> {
        self.ranking
            .iter()
            .next()
            .map(|(score, pairs)| (*score, pairs.as_slice()))
    }

    pub fn top(&self, k: usize) -> impl Iterator<Item = (&Score, &Vec<RankedPair>)> {
        self.ranking.iter().take(k)
    }

    pub fn ranked_len(&self) -> usize {
        self.ranking.values().map(Vec::len).sum()
    }
}

/// Cooperative cancellation flag, checked before each candidate pair.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(AtomicOrdering::Relaxed)
    }
}

enum Evaluation {
    Ranked(Score, RankedPair),
    Excluded(ExcludedPair),
}

pub fn scan_breakpoints(
    set: &MeasurementSet,
    config: &BreakpointConfig,
    opts: &ScanOptions,
    cancel: &CancelToken,
) -> Result<ScanOutcome, ScanError> {
    config.validate()?;

    let candidates = set.axis_values(Axis::Dia, opts.mode)?;
    let n = candidates.len();
    if n < 2 {
        debug!(candidates = n, "fewer than two DIA candidates, nothing to scan");
        return Ok(ScanOutcome::default());
    }

    let progress = AtomicUsize::new(0);
    let Some(rows) = evaluate_rows(set, config, opts, &candidates, cancel, &progress)? else {
        return Err(ScanError::Cancelled {
            evaluated: progress.load(AtomicOrdering::Relaxed),
        });
    };

    let mut outcome = ScanOutcome::default();
    for row in rows {
        for evaluation in row {
            outcome.evaluated += 1;
            match evaluation {
                Evaluation::Ranked(score, pair) => {
                    outcome.ranking.entry(score).or_default().push(pair);
                }
                Evaluation::Excluded(excluded) => outcome.excluded.push(excluded),
            }
        }
    }

    if !outcome.excluded.is_empty() {
        warn!(
            excluded = outcome.excluded.len(),
            evaluated = outcome.evaluated,
            reason = %outcome.excluded[0].reason,
            "candidate pairs excluded from ranking"
        );
    }
    Ok(outcome)
}

#[cfg(not(feature = "mt"))]
fn evaluate_rows(
    set: &MeasurementSet,
    config: &BreakpointConfig,
    opts: &ScanOptions,
    candidates: &[Ordinal],
    cancel: &CancelToken,
    progress: &AtomicUsize,
) -> Result<Option<Vec<Vec<Evaluation>>>, ScanError> {
    let rows: Option<Vec<Vec<Evaluation>>> = (0..candidates.len() - 1)
        .map(|i| evaluate_row(set, config, opts, candidates, i, cancel, progress))
        .collect();
    Ok(rows)
}

#[cfg(feature = "mt")]
fn evaluate_rows(
    set: &MeasurementSet,
    config: &BreakpointConfig,
    opts: &ScanOptions,
    candidates: &[Ordinal],
    cancel: &CancelToken,
    progress: &AtomicUsize,
) -> Result<Option<Vec<Vec<Evaluation>>>, ScanError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads.max(1))
        .build()
        .map_err(|e| ScanError::ThreadPool(e.to_string()))?;
    // collect keeps row order, so ties stay in scan order
    let rows: Option<Vec<Vec<Evaluation>>> = pool.install(|| {
        (0..candidates.len() - 1)
            .into_par_iter()
            .map(|i| evaluate_row(set, config, opts, candidates, i, cancel, progress))
            .collect()
    });
    Ok(rows)
}

/// All pairs `(candidates[i], candidates[j])` with `j > i`; `None` once cancelled.
fn evaluate_row(
    set: &MeasurementSet,
    config: &BreakpointConfig,
    opts: &ScanOptions,
    candidates: &[Ordinal],
    i: usize,
    cancel: &CancelToken,
    progress: &AtomicUsize,
) -> Option<Vec<Evaluation>> {
    let mut row = Vec::with_capacity(candidates.len() - i - 1);
    for j in (i + 1)..candidates.len() {
        if cancel.is_cancelled() {
            return None;
        }
        row.push(evaluate_pair(
            set,
            config,
            opts.rank_by,
            DiaBreakpoints::new(candidates[i], candidates[j]),
        ));
        progress.fetch_add(1, AtomicOrdering::Relaxed);
    }
    Some(row)
}

fn evaluate_pair(
    set: &MeasurementSet,
    config: &BreakpointConfig,
    rank_by: RankBy,
    candidate: DiaBreakpoints,
) -> Evaluation {
    let counts = classify_candidate(set.pair_counts(), config, candidate);
    let result = compute_indices(&counts, candidate, config);
    let ranked = rank_by
        .score(&result)
        .and_then(|score| Ok((score, result.fs?, result.fr?)));
    match ranked {
        Ok((score, fs, fr)) => Evaluation::Ranked(
            Score(score),
            RankedPair {
                dia_low: candidate.low,
                dia_high: candidate.high,
                fs,
                fr,
            },
        ),
        Err(reason) => {
            debug!(
                dia_low = %candidate.low,
                dia_high = %candidate.high,
                %reason,
                "candidate pair excluded"
            );
            Evaluation::Excluded(ExcludedPair { candidate, reason })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_scan.rs"]
mod tests;
