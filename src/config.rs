use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::{DEFAULT_HEADER_ROW, FALLBACK_HEADER_ROW, SWEEP_SKIP_LINES};
use crate::state::ParameterForm;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV: &str = "SAW_PLOTTER_CONFIG";
const CONFIG_FILE_NAME: &str = "saw_plotter.json";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How measurement files are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Non-blank line holding the column names of an instrument export.
    pub header_row: usize,
    /// Line tried when `header_row` has no frequency column.
    pub fallback_header_row: usize,
    /// Preamble lines before the data of a fixed-format sweep.
    pub sweep_skip_lines: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            header_row: DEFAULT_HEADER_ROW,
            fallback_header_row: FALLBACK_HEADER_ROW,
            sweep_skip_lines: SWEEP_SKIP_LINES,
        }
    }
}

/// Startup defaults. Read once, never written back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Initial values of the parameter form.
    pub defaults: ParameterForm,
    pub ingest: IngestConfig,
}

impl PlotterConfig {
    /// Load from `$SAW_PLOTTER_CONFIG` or `./saw_plotter.json`. A missing file
    /// gives the built-in defaults; a broken one is logged and ignored.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saw::ScalePolarity;

    #[test]
    fn test_defaults() {
        let config = PlotterConfig::default();
        assert_eq!(config.ingest.header_row, 2);
        assert_eq!(config.ingest.fallback_header_row, 0);
        assert_eq!(config.ingest.sweep_skip_lines, 3);
        assert_eq!(config.defaults.center_frequency_mhz, 100.0);
        assert_eq!(config.defaults.finger_count, 50);
        assert_eq!(config.defaults.polarity, ScalePolarity::Direct);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = PlotterConfig::from_json(
            r#"{ "defaults": { "center_frequency_mhz": 433.92, "polarity": "Inverted" },
                 "ingest": { "sweep_skip_lines": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.defaults.center_frequency_mhz, 433.92);
        assert_eq!(config.defaults.polarity, ScalePolarity::Inverted);
        assert_eq!(config.defaults.span_fraction, 0.5);
        assert_eq!(config.ingest.sweep_skip_lines, 5);
        assert_eq!(config.ingest.header_row, 2);
    }

    #[test]
    fn test_broken_json_is_an_error() {
        assert!(PlotterConfig::from_json("{ defaults: ").is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("saw_plotter_cfg_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "ingest": { "header_row": 4 } }"#).unwrap();
        let config = PlotterConfig::from_file(&path).unwrap();
        assert_eq!(config.ingest.header_row, 4);
        std::fs::remove_file(&path).ok();

        assert!(PlotterConfig::from_file(&path).is_err());
    }
}
