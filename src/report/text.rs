use crate::pipeline::stage3_indices::format_index_value;
use crate::pipeline::stage5_report::FinalSummary;

pub fn render_report(summary: &FinalSummary) -> String {
    let mut out = String::new();
    out.push_str("Kira Breakpoint Report\n");
    out.push_str("======================\n\n");
    out.push_str("DIA breakpoints are chosen to reproduce MIC-based S/I/R calls. ");
    out.push_str("Scores describe agreement on this data set only and carry no confidence interval.\n\n");

    out.push_str("Dataset overview:\n");
    out.push_str(&format!("- Source: {}\n", summary.input.source));
    out.push_str(&format!("- Measurements: {}\n", summary.input.n_measurements));
    out.push_str(&format!(
        "- Distinct MIC/DIA pairs: {}\n",
        summary.input.n_distinct_pairs
    ));
    let skipped = summary.input.load.skipped_malformed + summary.input.load.skipped_unparsable;
    out.push_str(&format!("- Rows skipped: {}\n", skipped));
    out.push_str(&format!(
        "- MIC breakpoints: R <= {} < I < {} <= S\n\n",
        summary.config.mic_low, summary.config.mic_high
    ));

    if let Some(scan) = &summary.scan {
        out.push_str(&format!(
            "Scan ({} candidates, ranked by {}):\n",
            scan.candidates,
            scan.rank_by.as_str()
        ));
        out.push_str(&format!("- Candidate pairs evaluated: {}\n", scan.evaluated));
        out.push_str(&format!("- Excluded (undefined index): {}\n", scan.excluded));
        if scan.top.is_empty() {
            out.push_str("- No admissible DIA breakpoint pair\n");
        }
        for entry in &scan.top {
            for p in &entry.pairs {
                out.push_str(&format!(
                    "- score {:.4}: DIA {} / {} (FS {:.2}%, FR {:.2}%)\n",
                    entry.score,
                    p.dia_low,
                    p.dia_high,
                    p.fs * 100.0,
                    p.fr * 100.0
                ));
            }
        }
        out.push('\n');
    }

    if let Some(chosen) = &summary.chosen {
        let t = &chosen.tally;
        out.push_str(&format!(
            "Selected pair DIA {} / {}:\n",
            chosen.candidate.low, chosen.candidate.high
        ));
        out.push_str(&format!("- Very major errors: {}\n", t.very_major_error));
        out.push_str(&format!("- Major errors: {}\n", t.major_error));
        out.push_str(&format!("- Minor errors: {}\n", t.minor_error));
        out.push_str(&format!("- dBETS: {:.4}\n", t.dbets));
        out.push_str(&format!("- BZK: {}\n", format_index_value(&chosen.bzk)));
        out.push_str(&format!(
            "- BZK weighted: {}\n",
            format_index_value(&chosen.bzk_weighted)
        ));
        out.push_str(&format!("- max_err: {}\n", format_index_value(&chosen.max_err)));
        out.push('\n');
    }

    out
}
