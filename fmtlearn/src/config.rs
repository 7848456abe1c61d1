//! Configuration loading.
//!
//! Settings live in an `fmtlearn.toml` under a `[fmtlearn]` table;
//! discovery walks up from a starting directory and falls back to
//! defaults when nothing is found.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file fmtlearn looks for.
pub const CONFIG_FILENAME: &str = "fmtlearn.toml";

/// Tab stop width used when the configuration does not set one.
pub const DEFAULT_TAB_SIZE: u32 = 4;

/// Top-level configuration struct.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// The main configuration section for fmtlearn.
    #[serde(default)]
    pub fmtlearn: FmtlearnConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` when using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

/// Configuration options for fmtlearn.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FmtlearnConfig {
    /// Columns per tab stop; drives the alignment detector's tab-stop
    /// rejection.
    pub tab_size: Option<u32>,
}

impl FmtlearnConfig {
    /// Configured tab size, defaulting to [`DEFAULT_TAB_SIZE`] and never
    /// below 1.
    #[must_use]
    pub fn effective_tab_size(&self) -> u32 {
        self.tab_size.unwrap_or(DEFAULT_TAB_SIZE).max(1)
    }
}

/// Error loading a specific configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads configuration from the current directory upward.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from `path` and traversing up,
    /// returning defaults when no usable file is found.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                if let Ok(config) = Self::load_file(&candidate) {
                    return config;
                }
            }
            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    /// Loads exactly one configuration file, surfacing read and parse
    /// errors instead of falling back.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.config_file_path = Some(path.to_path_buf());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.config_file_path.is_none());
        assert_eq!(config.fmtlearn.effective_tab_size(), DEFAULT_TAB_SIZE);
    }

    #[test]
    fn reads_tab_size_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[fmtlearn]\ntab_size = 8").unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.fmtlearn.tab_size, Some(8));
        assert_eq!(config.config_file_path, Some(path));
    }

    #[test]
    fn traverses_up_to_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "[fmtlearn]\ntab_size = 2\n").unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(config.fmtlearn.effective_tab_size(), 2);
    }

    #[test]
    fn load_file_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[fmtlearn\ntab_size = ").unwrap();

        let err = Config::load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_tab_size_is_clamped() {
        let cfg = FmtlearnConfig { tab_size: Some(0) };
        assert_eq!(cfg.effective_tab_size(), 1);
    }
}
