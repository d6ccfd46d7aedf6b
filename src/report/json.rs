use std::path::Path;

use crate::pipeline::stage5_report::{FinalSummary, Stage5Error};

pub fn write_summary(out_dir: &Path, summary: &FinalSummary) -> Result<(), Stage5Error> {
    let json = serde_json::to_string_pretty(summary)?;
    let path = out_dir.join("summary.json");
    std::fs::write(path, json)?;
    Ok(())
}
