//! Barangay Analytics - dashboard analytics for civic-services data
//!
//! A CLI tool that turns an exported admin dashboard snapshot
//! (incidents, document requests, polls, verification statistics)
//! into chart-ready breakdowns and a seven-day activity trend.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, unreadable snapshot, etc.)

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use cli::{Args, OutputFormat};
use config::{Config, TimeZoneChoice};
use models::{AnalyticsReport, DashboardSnapshot, ReportMetadata};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the log level, so it is loaded before logging starts
    let (mut config, config_source) = load_config(&args);
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("Barangay Analytics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    if let Err(e) = run(args, config) {
        error!("Analytics failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default configuration file.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE_NAME);
    println!("   Edit it to change the output path, time zone and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Load the snapshot, aggregate it and write the report.
fn run(args: Args, config: Config) -> Result<()> {
    let data_path = args
        .data
        .as_deref()
        .context("A snapshot file is required (--data)")?;
    let snapshot = loader::load_snapshot(data_path)?;

    let now = args.now.as_deref();
    let report = match config.trend.timezone {
        TimeZoneChoice::Local => build_report(&snapshot, data_path, now, &Local, "local")?,
        TimeZoneChoice::Utc => build_report(&snapshot, data_path, now, &Utc, "utc")?,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    let overview = &report.analytics.overview;
    if !args.quiet {
        println!("\n📊 Analytics Summary:");
        println!(
            "   Incidents: {} ({} pending, {:.1}% resolved)",
            overview.total_incidents, overview.pending_incidents, overview.resolution_rate
        );
        println!(
            "   Document requests: {} ({} pending)",
            overview.total_documents, overview.pending_documents
        );
        println!(
            "   Polls: {} ({} responses)",
            overview.total_polls, overview.total_poll_responses
        );
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    Ok(())
}

/// Resolve the reference instant in `zone` and run the aggregation.
fn build_report<Tz: TimeZone>(
    snapshot: &DashboardSnapshot,
    data_path: &Path,
    now: Option<&str>,
    zone: &Tz,
    zone_name: &str,
) -> Result<AnalyticsReport> {
    let reference: DateTime<Tz> = match now {
        Some(raw) => cli::parse_reference_instant(raw, zone)?,
        None => Utc::now().with_timezone(zone),
    };
    info!(
        "Trend window ends {} ({})",
        reference.date_naive(),
        zone_name
    );

    let analytics = analysis::build_dashboard_analytics(snapshot, &reference);

    Ok(AnalyticsReport {
        metadata: ReportMetadata {
            data_source: data_path.display().to_string(),
            reference_instant: reference.fixed_offset(),
            timezone: zone_name.to_string(),
            incident_count: snapshot.incidents.len(),
            document_count: snapshot.documents.len(),
            poll_count: snapshot.polls.len(),
        },
        analytics,
    })
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is initialized, so failures are reported on stderr.
/// Returns the config together with the file it came from, if any.
fn load_config(args: &Args) -> (Config, Option<PathBuf>) {
    let loaded = match args.config {
        Some(ref config_path) => Config::load(config_path).map(|c| Some((c, config_path.clone()))),
        None => Config::load_default()
            .map(|c| c.map(|c| (c, PathBuf::from(config::CONFIG_FILE_NAME)))),
    };

    match loaded {
        Ok(Some((config, path))) => (config, Some(path)),
        Ok(None) => (Config::default(), None),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            (Config::default(), None)
        }
    }
}
