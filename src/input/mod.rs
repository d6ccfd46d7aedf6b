pub mod pairs;

use std::path::{Path, PathBuf};
use std::{fmt, io};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("missing required file: {0}")]
    MissingFile(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported gzip input without feature enabled: {0}")]
    GzipNotEnabled(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub fn open_reader(path: &Path) -> Result<Box<dyn io::BufRead>, InputError> {
    if !path.is_file() {
        return Err(InputError::MissingFile(path_display(path).to_string()));
    }
    let file = std::fs::File::open(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        #[cfg(feature = "gz")]
        {
            let decoder = flate2::read::GzDecoder::new(file);
            return Ok(Box::new(io::BufReader::new(decoder)));
        }
        #[cfg(not(feature = "gz"))]
        {
            return Err(InputError::GzipNotEnabled(path.to_path_buf()));
        }
    }
    Ok(Box::new(io::BufReader::new(file)))
}

pub fn path_display(path: &Path) -> impl fmt::Display + '_ {
    path.to_string_lossy()
}
