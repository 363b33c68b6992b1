//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/tweetstats/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/tweetstats/` (~/.config/tweetstats/)
//! - Data: `$XDG_DATA_HOME/tweetstats/` (~/.local/share/tweetstats/)
//! - State/Logs: `$XDG_STATE_HOME/tweetstats/` (~/.local/state/tweetstats/)

use crate::error::{Error, Result};
use crate::stats::SignificanceTest;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analysis configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Synthetic fixture generator configuration
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis configuration
///
/// Reporting thresholds (outlier cut-off, monthly minimum, trend gates) are
/// constants in [`crate::analytics`], not settings.
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct AnalysisConfig {
    /// Which two-sample test backs the trend significance flag
    #[serde(default)]
    pub significance_test: SignificanceTest,
}

/// Synthetic fixture generator configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    /// RNG seed; the same seed always yields the same record set
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// First year to generate (inclusive)
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Last year to generate (inclusive)
    #[serde(default = "default_end_year")]
    pub end_year: i32,

    /// Write the generated set to `sample_tweets.csv` once
    #[serde(default = "default_write_fixture")]
    pub write_fixture: bool,

    /// Directory for the fixture file (defaults to the data dir)
    pub fixture_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            start_year: default_start_year(),
            end_year: default_end_year(),
            write_fixture: default_write_fixture(),
            fixture_dir: None,
        }
    }
}

impl GeneratorConfig {
    /// Resolved fixture file path.
    pub fn fixture_path(&self) -> PathBuf {
        self.fixture_dir
            .clone()
            .unwrap_or_else(Config::data_dir)
            .join("sample_tweets.csv")
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(Error::Config(format!(
                "generator.start_year ({}) must not be after generator.end_year ({})",
                self.start_year, self.end_year
            )));
        }
        Ok(())
    }
}

fn default_seed() -> u64 {
    42
}

fn default_start_year() -> i32 {
    2018
}

fn default_end_year() -> i32 {
    2024
}

fn default_write_fixture() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/tweetstats/config.toml` (~/.config/tweetstats/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("tweetstats").join("config.toml")
    }

    /// Returns the data directory path (for the generated fixture)
    ///
    /// `$XDG_DATA_HOME/tweetstats/` (~/.local/share/tweetstats/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("tweetstats")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/tweetstats/` (~/.local/state/tweetstats/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("tweetstats")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/tweetstats/tweetstats.log` (~/.local/state/tweetstats/tweetstats.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("tweetstats.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.significance_test, SignificanceTest::Student);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.start_year, 2018);
        assert_eq!(config.generator.end_year, 2024);
        assert!(config.generator.write_fixture);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analysis]
significance_test = "welch"

[generator]
seed = 7
start_year = 2020
end_year = 2021
write_fixture = false

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.analysis.significance_test, SignificanceTest::Welch);
        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.start_year, 2020);
        assert!(!config.generator.write_fixture);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generator_year_validation() {
        let config = GeneratorConfig {
            start_year: 2025,
            end_year: 2020,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_fixture_path_override() {
        let config = GeneratorConfig {
            fixture_dir: Some(PathBuf::from("/tmp/fixtures")),
            ..Default::default()
        };
        assert_eq!(
            config.fixture_path(),
            PathBuf::from("/tmp/fixtures/sample_tweets.csv")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generator]\nseed = 99\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.generator.seed, 99);
        assert_eq!(config.generator.end_year, 2024);
    }
}
