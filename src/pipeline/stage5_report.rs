use std::fmt::Write as FmtWrite;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::input::pairs::LoadStats;
use crate::model::calls::CategoryCount;
use crate::model::config::BreakpointConfig;
use crate::model::measurement::AxisBounds;
use crate::pipeline::stage1_load::DatasetCtx;
use crate::pipeline::stage2_classify::{DiaBreakpoints, classify_candidate};
use crate::pipeline::stage3_indices::{IndexResult, compute_indices, format_index_value};
use crate::pipeline::stage4_scan::{RankBy, RankedPair, ScanOptions, ScanOutcome};
use crate::report::grid::{build_density_grid, grid_mode, render_grid_tsv};
use crate::report::json::write_summary;
use crate::report::text::render_report;

#[derive(Debug, Error)]
pub enum Stage5Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalSummary {
    pub tool: ToolSummary,
    pub input: InputSummary,
    pub config: BreakpointConfig,
    pub scan: Option<ScanSummary>,
    pub chosen: Option<IndexResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub source: String,
    pub load: LoadStats,
    pub n_measurements: u64,
    pub n_distinct_pairs: usize,
    pub bounds: Option<AxisBounds>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub candidates: &'static str,
    pub rank_by: RankBy,
    pub evaluated: usize,
    pub ranked: usize,
    pub excluded: usize,
    pub top: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreEntry {
    pub score: f64,
    pub pairs: Vec<RankedPair>,
}

pub struct ReportInputs<'a> {
    pub dataset: &'a DatasetCtx,
    pub config: &'a BreakpointConfig,
    pub scan: Option<(&'a ScanOutcome, &'a ScanOptions)>,
    /// Pair detailed in categories/indices/grid; defaults to the first best pair.
    pub chosen: Option<DiaBreakpoints>,
    pub top: usize,
}

pub fn run_stage5_report(
    inputs: &ReportInputs<'_>,
    out_dir: &Path,
) -> Result<FinalSummary, Stage5Error> {
    let set = &inputs.dataset.set;

    let chosen = inputs.chosen.or_else(|| {
        inputs
            .scan
            .and_then(|(outcome, _)| outcome.best())
            .and_then(|(_, pairs)| pairs.first())
            .map(RankedPair::candidate)
    });

    let mut scan_summary = None;
    if let Some((outcome, opts)) = inputs.scan {
        write_ranking(&out_dir.join("ranking.tsv"), outcome, inputs.top)?;
        write_excluded(&out_dir.join("excluded.tsv"), outcome)?;
        scan_summary = Some(ScanSummary {
            candidates: opts.mode.as_str(),
            rank_by: opts.rank_by,
            evaluated: outcome.evaluated,
            ranked: outcome.ranked_len(),
            excluded: outcome.excluded.len(),
            top: outcome
                .top(inputs.top)
                .map(|(score, pairs)| ScoreEntry {
                    score: score.get(),
                    pairs: pairs.clone(),
                })
                .collect(),
        });
    }

    let mut chosen_result = None;
    if let Some(candidate) = chosen {
        let counts = classify_candidate(set.pair_counts(), inputs.config, candidate);
        let result = compute_indices(&counts, candidate, inputs.config);
        write_categories(&out_dir.join("categories.tsv"), &counts)?;
        write_indices(&out_dir.join("indices.tsv"), &result)?;
        chosen_result = Some(result);
    }

    let grid = build_density_grid(set, grid_mode(set));
    std::fs::write(
        out_dir.join("grid.tsv"),
        render_grid_tsv(&grid, inputs.config, chosen),
    )?;

    let summary = FinalSummary {
        tool: ToolSummary {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputSummary {
            source: inputs.dataset.source.clone(),
            load: inputs.dataset.stats.clone(),
            n_measurements: set.total(),
            n_distinct_pairs: set.distinct_pairs(),
            bounds: set.bounds(),
        },
        config: *inputs.config,
        scan: scan_summary,
        chosen: chosen_result,
    };

    write_summary(out_dir, &summary)?;
    std::fs::write(out_dir.join("report.txt"), render_report(&summary))?;
    Ok(summary)
}

fn write_ranking(path: &Path, outcome: &ScanOutcome, top: usize) -> Result<(), Stage5Error> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    writer.write_all(b"score\tdia_low\tdia_high\tFS\tFR\n")?;
    for (score, pairs) in outcome.top(top) {
        for p in pairs {
            writeln!(
                writer,
                "{}\t{}\t{}\t{:.6}\t{:.6}",
                score, p.dia_low, p.dia_high, p.fs, p.fr
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_excluded(path: &Path, outcome: &ScanOutcome) -> Result<(), Stage5Error> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    writer.write_all(b"dia_low\tdia_high\treason\n")?;
    for ex in &outcome.excluded {
        writeln!(
            writer,
            "{}\t{}\t{}",
            ex.candidate.low, ex.candidate.high, ex.reason
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_categories(path: &Path, counts: &CategoryCount) -> Result<(), Stage5Error> {
    let mut buf = String::new();
    buf.push_str("mic_call\tdia_call\ttier\tcount\n");
    for (category, count) in counts.iter() {
        let _ = writeln!(
            buf,
            "{}\t{}\t{}\t{}",
            category.mic.as_str(),
            category.dia.as_str(),
            category.tier.as_str(),
            count
        );
    }
    std::fs::write(path, buf)?;
    Ok(())
}

fn write_indices(path: &Path, result: &IndexResult) -> Result<(), Stage5Error> {
    let t = &result.tally;
    let lines: Vec<(&str, String)> = vec![
        ("dia_low", result.candidate.low.to_string()),
        ("dia_high", result.candidate.high.to_string()),
        ("total", t.total.to_string()),
        ("mic_S", t.susceptible.to_string()),
        ("mic_I", t.intermediate.to_string()),
        ("mic_R", t.resistant.to_string()),
        ("unclassifiable", t.unclassifiable.to_string()),
        ("minor_error", t.minor_error.to_string()),
        ("major_error", t.major_error.to_string()),
        ("very_major_error", t.very_major_error.to_string()),
        ("dBETS", format!("{:.6}", t.dbets)),
        ("BZK", format_index_value(&result.bzk)),
        ("BZK_weighted", format_index_value(&result.bzk_weighted)),
        ("FS", format_index_value(&result.fs)),
        ("FR", format_index_value(&result.fr)),
        ("max_err", format_index_value(&result.max_err)),
    ];
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

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
