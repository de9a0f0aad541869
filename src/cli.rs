//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::TimeZoneChoice;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone};
use clap::Parser;
use std::path::PathBuf;

/// Barangay Analytics - dashboard analytics for civic-services data
///
/// Reads an exported dashboard snapshot (incidents, document requests,
/// polls, verification statistics) and writes chart-ready breakdowns,
/// a seven-day activity trend and participation figures as Markdown or JSON.
///
/// Examples:
///   barangay-analytics --data snapshot.json
///   barangay-analytics --data snapshot.json --format json -o analytics.json
///   barangay-analytics --data snapshot.json --now 2024-01-10 --timezone utc
///   barangay-analytics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dashboard snapshot JSON file
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub data: Option<PathBuf>,

    /// Reference instant for the activity trend
    ///
    /// RFC 3339 timestamp or YYYY-MM-DD (noon in the selected zone).
    /// Defaults to the current time.
    #[arg(long, value_name = "INSTANT", env = "BARANGAY_ANALYTICS_NOW")]
    pub now: Option<String>,

    /// Time zone used to bucket records into days
    #[arg(long, value_name = "ZONE")]
    pub timezone: Option<TimeZoneChoice>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting (barangay_analytics.md).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .barangay-analytics.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave the priority x status scatter table out of the report
    #[arg(long)]
    pub no_scatter: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .barangay-analytics.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.is_file() {
                return Err(format!("Snapshot file does not exist: {}", data.display()));
            }
        }

        if let Some(ref now) = self.now {
            if parse_reference_instant(now, &chrono::Utc).is_err() {
                return Err(format!(
                    "--now must be an RFC 3339 timestamp or YYYY-MM-DD, got '{}'",
                    now
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins
    /// over both it and `--verbose`.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Parse a `--now` value into an instant in `zone`.
///
/// A bare date is taken as noon local to `zone`, which keeps it on the same
/// calendar day whatever the zone's offset.
pub fn parse_reference_instant<Tz: TimeZone>(raw: &str, zone: &Tz) -> Result<DateTime<Tz>> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(zone));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid reference instant: {}", raw))?;
    let noon = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow!("Invalid reference instant: {}", raw))?;

    zone.from_local_datetime(&noon)
        .earliest()
        .ok_or_else(|| anyhow!("Reference instant {} does not exist in the selected zone", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike, Utc};

    fn make_args() -> Args {
        Args {
            data: None,
            now: None,
            timezone: None,
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            no_scatter: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_snapshot() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("/definitely/not/here.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_bad_now() {
        let mut args = make_args();
        args.now = Some("yesterday".to_string());
        assert!(args.validate().is_err());

        args.now = Some("2024-01-10".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_config_verbose_enables_debug_logging() {
        let mut args = make_args();
        let config: crate::config::Config =
            toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_reference_instant() {
        let date_only = parse_reference_instant("2024-01-10", &Utc).unwrap();
        assert_eq!(date_only.day(), 10);
        assert_eq!(date_only.hour(), 12);

        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        let converted = parse_reference_instant("2024-01-09T20:00:00Z", &manila).unwrap();
        assert_eq!(converted.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        assert!(parse_reference_instant("10/01/2024", &Utc).is_err());
    }

    #[test]
    fn test_parses_command_line() {
        let args = Args::try_parse_from([
            "barangay-analytics",
            "--data",
            "snapshot.json",
            "--timezone",
            "utc",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.timezone, Some(TimeZoneChoice::Utc));
        assert_eq!(args.format, OutputFormat::Json);

        assert!(Args::try_parse_from(["barangay-analytics"]).is_err());
        assert!(Args::try_parse_from(["barangay-analytics", "--init-config"]).is_ok());
    }
}
