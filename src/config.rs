//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.barangay-analytics.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".barangay-analytics.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Activity trend settings.
    #[serde(default)]
    pub trend: TrendConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "barangay_analytics.md".to_string()
}

/// Time zone used to bucket records into calendar days.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneChoice {
    /// The machine's local zone
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
}

/// Activity trend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Zone for day bucketing.
    #[serde(default)]
    pub timezone: TimeZoneChoice,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the priority x status scatter table.
    #[serde(default = "default_true")]
    pub include_scatter: bool,

    /// Maximum scatter rows in the Markdown report.
    #[serde(default = "default_scatter_rows")]
    pub max_scatter_rows: usize,

    /// Include the poll participation table.
    #[serde(default = "default_true")]
    pub include_polls: bool,

    /// Include resident verification figures when present.
    #[serde(default = "default_true")]
    pub include_verification: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_scatter: true,
            max_scatter_rows: default_scatter_rows(),
            include_polls: true,
            include_verification: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_scatter_rows() -> usize {
    25
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(timezone) = args.timezone {
            self.trend.timezone = timezone;
        }

        if args.no_scatter {
            self.report.include_scatter = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "barangay_analytics.md");
        assert_eq!(config.trend.timezone, TimeZoneChoice::Local);
        assert_eq!(config.report.max_scatter_rows, 25);
        assert!(config.report.include_polls);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "weekly.md"
verbose = true

[trend]
timezone = "utc"

[report]
include_scatter = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "weekly.md");
        assert!(config.general.verbose);
        assert_eq!(config.trend.timezone, TimeZoneChoice::Utc);
        assert!(!config.report.include_scatter);
        assert_eq!(config.report.max_scatter_rows, 25);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[trend]"));
        assert!(toml_str.contains("[report]"));

        let round: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round.trend.timezone, TimeZoneChoice::Local);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[report]\nmax_scatter_rows = 5\n")
            .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.report.max_scatter_rows, 5);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[report\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }
}
