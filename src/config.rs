//! Configuration for the screen buffer
//!
//! Settings load from JSON. Missing fields take their defaults, and
//! out-of-range values are clamped when the buffer is built rather than
//! rejected. Environment variables (`TERMBUF_COLS`, `TERMBUF_ROWS`,
//! `TERMBUF_SCROLLBACK`, `TERMBUF_CONVERT_EOL`) override the file.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::clamp_dimension;

/// Screen buffer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial width in columns
    pub cols: usize,
    /// Initial height in rows
    pub rows: usize,
    /// Lines kept above the viewport
    pub scrollback_limit: usize,
    /// Treat LF as CR LF (line-feed mode on from the start)
    pub convert_eol: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            scrollback_limit: 1000,
            convert_eol: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        debug!(?path, ?config, "loaded config");
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `TERMBUF_*` environment variables on top of this config
    pub fn apply_env_vars(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable values are logged
    /// and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| -> Option<usize> {
            let val = lookup(key)?;
            match val.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(key, value = %val, "ignoring invalid override");
                    None
                }
            }
        };

        if let Some(cols) = number("TERMBUF_COLS") {
            self.cols = cols;
        }
        if let Some(rows) = number("TERMBUF_ROWS") {
            self.rows = rows;
        }
        if let Some(limit) = number("TERMBUF_SCROLLBACK") {
            self.scrollback_limit = limit;
        }
        if let Some(val) = lookup("TERMBUF_CONVERT_EOL") {
            self.convert_eol = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Width clamped into `1..=MAX_DIMENSION`
    pub fn effective_cols(&self) -> usize {
        clamp_dimension(self.cols)
    }

    /// Height clamped into `1..=MAX_DIMENSION`
    pub fn effective_rows(&self) -> usize {
        clamp_dimension(self.rows)
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!((config.cols, config.rows), (80, 24));
        assert_eq!(config.scrollback_limit, 1000);
        assert!(!config.convert_eol);
    }

    #[test]
    fn test_config_partial_json() {
        let config = Config::from_json(r#"{ "rows": 50 }"#).unwrap();
        assert_eq!(config.rows, 50);
        assert_eq!(config.cols, 80);
        assert_eq!(config.scrollback_limit, 1000);
    }

    #[test]
    fn test_config_invalid_json() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_config_clamps_dimensions() {
        let config = Config {
            cols: 0,
            rows: 1_000_000,
            ..Config::default()
        };
        assert_eq!(config.effective_cols(), 1);
        assert_eq!(config.effective_rows(), crate::core::MAX_DIMENSION);
    }

    #[test]
    fn test_config_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("termbuf.json");

        let config = Config {
            cols: 132,
            rows: 43,
            scrollback_limit: 5000,
            convert_eol: true,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_config_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TERMBUF_COLS", "100"),
            ("TERMBUF_ROWS", "not a number"),
            ("TERMBUF_CONVERT_EOL", "TRUE"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.cols, 100);
        assert_eq!(config.rows, 24);
        assert_eq!(config.scrollback_limit, 1000);
        assert!(config.convert_eol);
    }
}
