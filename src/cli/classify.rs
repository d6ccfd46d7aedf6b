use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::cli::common::{BreakpointArgs, InputArgs, resolve};
use crate::pipeline::stage1_load::run_stage1_path;
use crate::pipeline::stage2_classify::DiaBreakpoints;
use crate::pipeline::stage5_report::{ReportInputs, run_stage5_report};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,

    #[command(flatten)]
    pub(crate) breakpoints: BreakpointArgs,

    /// Lower DIA breakpoint (values at or below are S)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) dia_low: f64,

    /// Upper DIA breakpoint (values at or above are R)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) dia_high: f64,
}

pub fn handle(args: ClassifyArgs) -> anyhow::Result<()> {
    let Some(candidate) = DiaBreakpoints::ordered(args.dia_low, args.dia_high) else {
        anyhow::bail!(
            "--dia-low ({}) must be strictly below --dia-high ({})",
            args.dia_low,
            args.dia_high
        );
    };
    let resolved = resolve(&args.input, &args.breakpoints)?;
    std::fs::create_dir_all(&args.input.out)?;

    let start = Instant::now();
    info!(stage = "stage1_load", "starting stage");
    let ctx = run_stage1_path(&args.input.input, &resolved.ingest)?;
    info!(
        stage = "stage1_load",
        elapsed_ms = start.elapsed().as_millis(),
        measurements = ctx.set.total(),
        "finished stage"
    );

    let start = Instant::now();
    info!(stage = "stage5_report", "starting stage");
    let summary = run_stage5_report(
        &ReportInputs {
            dataset: &ctx,
            config: &resolved.config,
            scan: None,
            chosen: Some(candidate),
            top: 0,
        },
        &args.input.out,
    )?;
    if let Some(chosen) = &summary.chosen {
        info!(
            very_major = chosen.tally.very_major_error,
            major = chosen.tally.major_error,
            minor = chosen.tally.minor_error,
            dbets = chosen.tally.dbets,
            "classified pair"
        );
    }
    info!(
        stage = "stage5_report",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );
    Ok(())
}
