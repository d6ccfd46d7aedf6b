use std::fmt::Write as FmtWrite;

use tracing::debug;

use crate::model::config::BreakpointConfig;
use crate::model::measurement::{Axis, CandidateMode, MAX_INTEGER_SPAN, MeasurementSet};
use crate::model::ordinal::Ordinal;
use crate::pipeline::stage2_classify::{DiaBreakpoints, classify_dia, classify_mic};

/// MIC x DIA occurrence counts. Rows run from the highest MIC down, columns from the
/// lowest DIA up; absent combinations are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub mic_values: Vec<Ordinal>,
    pub dia_values: Vec<Ordinal>,
    pub cells: Vec<Vec<Option<u64>>>,
}

/// Integer data gets the full integer span so gaps show up as empty columns, unless
/// either span is wider than [`MAX_INTEGER_SPAN`].
pub fn grid_mode(set: &MeasurementSet) -> CandidateMode {
    let integral = set
        .mic_axis()
        .iter()
        .chain(set.dia_axis().iter())
        .all(|v| v.is_integral());
    let fits = [Axis::Mic, Axis::Dia]
        .iter()
        .all(|&axis| set.integer_span_len(axis).is_some_and(|n| n <= MAX_INTEGER_SPAN));
    if integral && fits {
        CandidateMode::IntegerRange
    } else {
        CandidateMode::Observed
    }
}

/// An axis whose integer span is too wide falls back to its observed values.
pub fn build_density_grid(set: &MeasurementSet, mode: CandidateMode) -> DensityGrid {
    let mut mic_values = grid_axis(set, Axis::Mic, mode);
    mic_values.reverse();
    let dia_values = grid_axis(set, Axis::Dia, mode);
    let cells = mic_values
        .iter()
        .map(|&mic| {
            dia_values
                .iter()
                .map(|&dia| Some(set.count(mic, dia)).filter(|c| *c > 0))
                .collect()
        })
        .collect();
    DensityGrid {
        mic_values,
        dia_values,
        cells,
    }
}

fn grid_axis(set: &MeasurementSet, axis: Axis, mode: CandidateMode) -> Vec<Ordinal> {
    match set.axis_values(axis, mode) {
        Ok(values) => values,
        Err(err) => {
            debug!(%err, "grid axis falls back to observed values");
            set.observed_values(axis)
        }
    }
}

pub fn render_grid_tsv(
    grid: &DensityGrid,
    config: &BreakpointConfig,
    chosen: Option<DiaBreakpoints>,
) -> String {
    let mut out = String::new();
    out.push_str("MIC\tmic_call");
    for dia in &grid.dia_values {
        let _ = write!(out, "\t{dia}");
    }
    out.push('\n');

    if let Some(candidate) = chosen {
        out.push_str("dia_call\t.");
        for dia in &grid.dia_values {
            let _ = write!(out, "\t{}", classify_dia(dia.get(), candidate).as_str());
        }
        out.push('\n');
    }

    for (mic, row) in grid.mic_values.iter().zip(grid.cells.iter()) {
        let (call, _) = classify_mic(mic.get(), config);
        let _ = write!(out, "{mic}\t{}", call.as_str());
        for cell in row {
            out.push('\t');
            if let Some(count) = cell {
                let _ = write!(out, "{count}");
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/grid.rs"]
mod tests;
