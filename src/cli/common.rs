use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::input::pairs::{IngestOptions, MicTransform, NumericMode};
use crate::model::config::{BreakpointConfig, ConfigFile, delimiter_byte, load_config_file};

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Two-column MIC/DIA file with a header line (.gz accepted)
    #[arg(long)]
    pub(crate) input: PathBuf,

    /// Output directory
    #[arg(long)]
    pub(crate) out: PathBuf,

    /// Optional TOML configuration
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Column delimiter (default ",")
    #[arg(long)]
    pub(crate) delim: Option<char>,

    /// Value parsing
    #[arg(long, value_enum, default_value = "int")]
    pub(crate) numeric: NumericArg,

    /// Replace MIC concentrations by their log2 (implies float parsing)
    #[arg(long)]
    pub(crate) mic_log2: bool,
}

#[derive(Args, Debug, Default)]
pub struct BreakpointArgs {
    /// Lower MIC breakpoint (values at or below are R)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) mic_low: Option<f64>,

    /// Upper MIC breakpoint (values at or above are S)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) mic_high: Option<f64>,

    /// Major vs minor trade-off for the weighted BZK index
    #[arg(long)]
    pub(crate) bzk_alpha: Option<f64>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericArg {
    Int,
    Float,
}

pub(crate) struct Resolved {
    pub(crate) config: BreakpointConfig,
    pub(crate) ingest: IngestOptions,
}

/// Defaults, then the config file, then command line flags.
pub(crate) fn resolve(input: &InputArgs, bp: &BreakpointArgs) -> anyhow::Result<Resolved> {
    let file = match &input.config {
        Some(path) => {
            info!(config = %path.to_string_lossy(), "loading configuration");
            load_config_file(path)?
        }
        None => ConfigFile::default(),
    };

    let mut config = file.apply(BreakpointConfig::default());
    if let Some(v) = bp.mic_low {
        config.mic_low = v;
    }
    if let Some(v) = bp.mic_high {
        config.mic_high = v;
    }
    if let Some(v) = bp.bzk_alpha {
        config.bzk_alpha = v;
    }
    config.validate()?;

    let delim = input.delim.or(file.delimiter).unwrap_or(',');
    let numeric = if input.mic_log2 || input.numeric == NumericArg::Float {
        NumericMode::Float
    } else {
        NumericMode::Integer
    };
    let mic_transform = if input.mic_log2 {
        MicTransform::Log2
    } else {
        MicTransform::None
    };

    Ok(Resolved {
        config,
        ingest: IngestOptions {
            delimiter: delimiter_byte(delim)?,
            numeric,
            mic_transform,
        },
    })
}
