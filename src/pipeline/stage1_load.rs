use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::input::InputError;
use crate::input::pairs::{IngestOptions, LoadStats, read_pairs_path, read_pairs_str};
use crate::model::measurement::MeasurementSet;

#[derive(Debug, Error)]
pub enum Stage1Error {
    #[error("input error: {0}")]
    Input(#[from] InputError),
}

#[derive(Debug, Clone)]
pub enum InputSource {
    File(PathBuf),
    Inline(String),
}

impl InputSource {
    pub fn label(&self) -> String {
        match self {
            InputSource::File(path) => path.to_string_lossy().to_string(),
            InputSource::Inline(_) => "<inline>".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatasetCtx {
    pub source: String,
    pub set: MeasurementSet,
    pub stats: LoadStats,
}

pub fn run_stage1(source: &InputSource, opts: &IngestOptions) -> Result<DatasetCtx, Stage1Error> {
    let (set, stats) = match source {
        InputSource::File(path) => read_pairs_path(path, opts)?,
        InputSource::Inline(text) => read_pairs_str(text, opts)?,
    };

    if stats.skipped_malformed > 0 || stats.skipped_unparsable > 0 {
        warn!(
            source = %source.label(),
            malformed = stats.skipped_malformed,
            unparsable = stats.skipped_unparsable,
            "rows skipped during load"
        );
    }
    if set.is_empty() {
        warn!(source = %source.label(), "no measurement pairs loaded");
    }

    Ok(DatasetCtx {
        source: source.label(),
        set,
        stats,
    })
}

pub fn run_stage1_path(path: &Path, opts: &IngestOptions) -> Result<DatasetCtx, Stage1Error> {
    run_stage1(&InputSource::File(path.to_path_buf()), opts)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_load.rs"]
mod tests;
