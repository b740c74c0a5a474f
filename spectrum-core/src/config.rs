//! # Analyzer Configuration
//!
//! Settings shared by the capture, worker and display layers, stored as
//! pretty-printed JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tables::MAX_BITS;

/// Sample representation requested from the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    I16,
    F32,
}

/// Runtime settings for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Block exponent; each analysis covers `2^bits` samples.
    pub bits: u32,
    /// Channel of the interleaved stream to analyze.
    pub channel: usize,
    /// Preferred capture rate in Hz.
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    /// Per-frame fall-off of the displayed bars (GUI only).
    pub decay: f32,
    /// Panels shown at startup (GUI only).
    pub show_spectrum: bool,
    pub show_meter: bool,
    pub log_level: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            bits: MAX_BITS,
            channel: 0,
            sample_rate: 44100,
            sample_format: SampleFormat::F32,
            decay: 0.85,
            show_spectrum: true,
            show_meter: true,
            log_level: "info".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Checks the ranges the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        if self.bits > MAX_BITS {
            bail!("bits must be at most {}, got {}", MAX_BITS, self.bits);
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            bail!("decay must be in (0, 1], got {}", self.decay);
        }
        if self.sample_rate == 0 {
            bail!("sample_rate must be non-zero");
        }
        Ok(())
    }

    /// Loads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalyzerConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        info!("[CONFIG] Loaded {}", path.display());
        Ok(config)
    }

    /// Loads a config file, falling back to defaults when it is missing.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("[CONFIG] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Saves the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }
}
