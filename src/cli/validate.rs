use std::path::Path;
use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::cli::common::{BreakpointArgs, InputArgs, resolve};
use crate::pipeline::stage1_load::{DatasetCtx, run_stage1_path};
use crate::report::grid::{build_density_grid, grid_mode, render_grid_tsv};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,

    #[command(flatten)]
    pub(crate) breakpoints: BreakpointArgs,
}

pub fn handle(args: ValidateArgs) -> anyhow::Result<()> {
    let resolved = resolve(&args.input, &args.breakpoints)?;
    std::fs::create_dir_all(&args.input.out)?;

    let start = Instant::now();
    info!(stage = "stage1_load", "starting stage");
    let ctx = run_stage1_path(&args.input.input, &resolved.ingest)?;
    info!(
        stage = "stage1_load",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );

    write_validate(&args.input.out, &ctx)?;
    let grid = build_density_grid(&ctx.set, grid_mode(&ctx.set));
    std::fs::write(
        args.input.out.join("grid.tsv"),
        render_grid_tsv(&grid, &resolved.config, None),
    )?;
    Ok(())
}

fn write_validate(out_dir: &Path, ctx: &DatasetCtx) -> anyhow::Result<()> {
    let mut lines = Vec::new();
    lines.push(("source", ctx.source.clone()));
    lines.push(("rows_read", ctx.stats.rows_read.to_string()));
    lines.push(("rows_accepted", ctx.stats.rows_accepted.to_string()));
    lines.push(("skipped_malformed", ctx.stats.skipped_malformed.to_string()));
    lines.push(("skipped_unparsable", ctx.stats.skipped_unparsable.to_string()));
    lines.push(("n_measurements", ctx.set.total().to_string()));
    lines.push(("n_distinct_pairs", ctx.set.distinct_pairs().to_string()));
    lines.push(("n_mic_values", ctx.set.mic_axis().len().to_string()));
    lines.push(("n_dia_values", ctx.set.dia_axis().len().to_string()));
    if let Some(bounds) = ctx.set.bounds() {
        lines.push(("mic_min", bounds.mic_min.to_string()));
        lines.push(("mic_max", bounds.mic_max.to_string()));
        lines.push(("dia_min", bounds.dia_min.to_string()));
        lines.push(("dia_max", bounds.dia_max.to_string()));
    }

    let path = out_dir.join("validate.tsv");
    let mut buf = String::new();
    for (k, v) in lines {
        buf.push_str(k);
        buf.push('\t');
        buf.push_str(&v);
        buf.push('\n');
    }
    std::fs::write(path, buf)?;
    Ok(())
}
