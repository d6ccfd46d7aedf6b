use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::calls::Tier;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("mic_low ({low}) must be strictly below mic_high ({high})")]
    MicOrder { low: f64, high: f64 },
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("weight {tier}.{name} must be non-negative, got {value}")]
    NegativeWeight {
        tier: &'static str,
        name: &'static str,
        value: f64,
    },
    #[error("bzk_alpha must lie in [0, 1], got {0}")]
    AlphaOutOfRange(f64),
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(char),
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierWeights {
    pub minor: f64,
    pub major: f64,
    pub very_major: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorWeights {
    pub near: TierWeights,
    pub far: TierWeights,
}

impl ErrorWeights {
    pub fn for_tier(&self, tier: Tier) -> &TierWeights {
        match tier {
            Tier::Near => &self.near,
            Tier::Far => &self.far,
        }
    }
}

impl Default for ErrorWeights {
    fn default() -> Self {
        Self {
            near: TierWeights {
                minor: 1.0,
                major: 4.0,
                very_major: 4.0,
            },
            far: TierWeights {
                minor: 8.0,
                major: 20.0,
                very_major: 20.0,
            },
        }
    }
}

/// MIC breakpoints and scoring weights. Passed by reference into every scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakpointConfig {
    pub mic_low: f64,
    pub mic_high: f64,
    pub weights: ErrorWeights,
    pub bzk_alpha: f64,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            mic_low: -1.0,
            mic_high: 1.0,
            weights: ErrorWeights::default(),
            bzk_alpha: 0.8,
        }
    }
}

impl BreakpointConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("mic_low", self.mic_low),
            ("mic_high", self.mic_high),
            ("bzk_alpha", self.bzk_alpha),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }
        if self.mic_low >= self.mic_high {
            return Err(ConfigError::MicOrder {
                low: self.mic_low,
                high: self.mic_high,
            });
        }
        if !(0.0..=1.0).contains(&self.bzk_alpha) {
            return Err(ConfigError::AlphaOutOfRange(self.bzk_alpha));
        }
        for (tier, w) in [("near", &self.weights.near), ("far", &self.weights.far)] {
            for (name, value) in [
                ("minor", w.minor),
                ("major", w.major),
                ("very_major", w.very_major),
            ] {
                if !value.is_finite() {
                    return Err(ConfigError::NotFinite { name, value });
                }
                if value < 0.0 {
                    return Err(ConfigError::NegativeWeight { tier, name, value });
                }
            }
        }
        Ok(())
    }

    /// Width of the intermediate MIC zone minus one step.
    pub fn mic_range(&self) -> f64 {
        self.mic_high - self.mic_low - 1.0
    }
}

/// On-disk TOML configuration. Every key is optional and falls back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub mic_low: Option<f64>,
    pub mic_high: Option<f64>,
    pub bzk_alpha: Option<f64>,
    pub delimiter: Option<char>,
    pub weights: Option<WeightsFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightsFile {
    pub near: Option<TierWeights>,
    pub far: Option<TierWeights>,
}

impl ConfigFile {
    pub fn apply(&self, base: BreakpointConfig) -> BreakpointConfig {
        let mut out = base;
        if let Some(v) = self.mic_low {
            out.mic_low = v;
        }
        if let Some(v) = self.mic_high {
            out.mic_high = v;
        }
        if let Some(v) = self.bzk_alpha {
            out.bzk_alpha = v;
        }
        if let Some(weights) = &self.weights {
            if let Some(near) = weights.near {
                out.weights.near = near;
            }
            if let Some(far) = weights.far {
                out.weights.far = far;
            }
        }
        out
    }
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&text)?;
    Ok(parsed)
}

pub fn delimiter_byte(delim: char) -> Result<u8, ConfigError> {
    if delim.is_ascii() {
        Ok(delim as u8)
    } else {
        Err(ConfigError::Delimiter(delim))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/config.rs"]
mod tests;
