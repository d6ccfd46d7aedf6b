use std::io::Read;
use std::path::Path;
use std::str;

use serde::Serialize;
use tracing::warn;

use crate::input::{InputError, open_reader};
use crate::model::measurement::{MeasurementPair, MeasurementSet};
use crate::model::ordinal::Ordinal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericMode {
    /// Raw dilution codes and zone diameters.
    #[default]
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MicTransform {
    #[default]
    None,
    /// Replace MIC concentrations by their base-2 logarithm.
    Log2,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub delimiter: u8,
    pub numeric: NumericMode,
    pub mic_transform: MicTransform,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            numeric: NumericMode::Integer,
            mic_transform: MicTransform::None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub skipped_malformed: usize,
    pub skipped_unparsable: usize,
}

pub fn read_pairs_path(
    path: &Path,
    opts: &IngestOptions,
) -> Result<(MeasurementSet, LoadStats), InputError> {
    let reader = open_reader(path)?;
    read_pairs(reader, opts)
}

pub fn read_pairs_str(
    text: &str,
    opts: &IngestOptions,
) -> Result<(MeasurementSet, LoadStats), InputError> {
    read_pairs(text.as_bytes(), opts)
}

/// Header-prefixed MIC/DIA stream. Rows without exactly two fields, or with values
/// that do not parse, are skipped and counted.
pub fn read_pairs<R: Read>(
    reader: R,
    opts: &IngestOptions,
) -> Result<(MeasurementSet, LoadStats), InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stats = LoadStats::default();
    let mut pairs = Vec::new();
    let mut record = csv::ByteRecord::new();

    while rdr.read_byte_record(&mut record)? {
        stats.rows_read += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 2 {
            stats.skipped_malformed += 1;
            continue;
        }
        let (Ok(mic), Ok(dia)) = (str::from_utf8(&record[0]), str::from_utf8(&record[1])) else {
            warn!(
                line,
                mic = %String::from_utf8_lossy(&record[0]),
                dia = %String::from_utf8_lossy(&record[1]),
                "skipping row with invalid utf-8"
            );
            stats.skipped_unparsable += 1;
            continue;
        };
        match parse_pair(mic, dia, opts) {
            Some(pair) => {
                stats.rows_accepted += 1;
                pairs.push(pair);
            }
            None => {
                warn!(line, mic, dia, "skipping unparsable row");
                stats.skipped_unparsable += 1;
            }
        }
    }

    Ok((MeasurementSet::from_pairs(pairs), stats))
}

fn parse_pair(mic: &str, dia: &str, opts: &IngestOptions) -> Option<MeasurementPair> {
    let mic = parse_value(mic, opts.numeric)?;
    let mic = match opts.mic_transform {
        MicTransform::None => mic,
        MicTransform::Log2 => {
            if mic <= 0.0 {
                return None;
            }
            mic.log2()
        }
    };
    let dia = parse_value(dia, opts.numeric)?;
    Some(MeasurementPair::new(Ordinal::new(mic)?, Ordinal::new(dia)?))
}

fn parse_value(field: &str, mode: NumericMode) -> Option<f64> {
    match mode {
        NumericMode::Integer => field.parse::<i64>().ok().map(|v| v as f64),
        NumericMode::Float => field.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/pairs.rs"]
mod tests;
