use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::cli::common::{BreakpointArgs, InputArgs, resolve};
use crate::model::measurement::CandidateMode;
use crate::pipeline::stage1_load::run_stage1_path;
use crate::pipeline::stage4_scan::{CancelToken, RankBy, ScanOptions, scan_breakpoints};
use crate::pipeline::stage5_report::{ReportInputs, run_stage5_report};

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,

    #[command(flatten)]
    pub(crate) breakpoints: BreakpointArgs,

    /// Candidate DIA thresholds
    #[arg(long, value_enum, default_value = "observed")]
    pub(crate) candidates: CandidatesArg,

    /// Index used to rank candidate pairs
    #[arg(long, value_enum, default_value = "max-err")]
    pub(crate) rank_by: RankByArg,

    /// Number of best scores written to the ranking
    #[arg(long, default_value_t = 3)]
    pub(crate) top: usize,

    /// Worker threads (builds with the `mt` feature)
    #[arg(long)]
    pub(crate) threads: Option<usize>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidatesArg {
    Observed,
    IntegerRange,
}

impl From<CandidatesArg> for CandidateMode {
    fn from(value: CandidatesArg) -> Self {
        match value {
            CandidatesArg::Observed => CandidateMode::Observed,
            CandidatesArg::IntegerRange => CandidateMode::IntegerRange,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankByArg {
    MaxErr,
    Dbets,
    Bzk,
    BzkWeighted,
}

impl From<RankByArg> for RankBy {
    fn from(value: RankByArg) -> Self {
        match value {
            RankByArg::MaxErr => RankBy::MaxErr,
            RankByArg::Dbets => RankBy::Dbets,
            RankByArg::Bzk => RankBy::Bzk,
            RankByArg::BzkWeighted => RankBy::BzkWeighted,
        }
    }
}

pub fn handle(args: ScanArgs) -> anyhow::Result<()> {
    let resolved = resolve(&args.input, &args.breakpoints)?;
    std::fs::create_dir_all(&args.input.out)?;

    let start = Instant::now();
    info!(stage = "stage1_load", "starting stage");
    let ctx = run_stage1_path(&args.input.input, &resolved.ingest)?;
    info!(
        stage = "stage1_load",
        elapsed_ms = start.elapsed().as_millis(),
        measurements = ctx.set.total(),
        distinct_pairs = ctx.set.distinct_pairs(),
        "finished stage"
    );

    let opts = ScanOptions {
        mode: args.candidates.into(),
        rank_by: args.rank_by.into(),
        threads: args.threads.unwrap_or_else(default_threads),
    };

    let start = Instant::now();
    info!(
        stage = "stage4_scan",
        candidates = opts.mode.as_str(),
        rank_by = opts.rank_by.as_str(),
        "starting stage"
    );
    let outcome = scan_breakpoints(&ctx.set, &resolved.config, &opts, &CancelToken::new())?;
    info!(
        stage = "stage4_scan",
        elapsed_ms = start.elapsed().as_millis(),
        evaluated = outcome.evaluated,
        excluded = outcome.excluded.len(),
        "finished stage"
    );
    if let Some((score, pairs)) = outcome.best() {
        for p in pairs {
            info!(
                score = score.get(),
                dia_low = %p.dia_low,
                dia_high = %p.dia_high,
                fs = p.fs,
                fr = p.fr,
                "best pair"
            );
        }
    }

    let start = Instant::now();
    info!(stage = "stage5_report", "starting stage");
    run_stage5_report(
        &ReportInputs {
            dataset: &ctx,
            config: &resolved.config,
            scan: Some((&outcome, &opts)),
            chosen: None,
            top: args.top,
        },
        &args.input.out,
    )?;
    info!(
        stage = "stage5_report",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );
    Ok(())
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
