//! CLI entry point for the bikeshare explorer.

use anyhow::{Result, anyhow};
use bikeshare_explorer::config::{DATA_DIR_ENV, DEFAULT_DATA_DIR};
use bikeshare_explorer::{City, DayFilter, ExplorerConfig, FilterSelection, MonthFilter, Session};
use clap::Parser;
use dotenv::dotenv;
use serde_json::json;
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Explore US bikeshare trip data",
    long_about = "Descriptive statistics over bike share trips in Chicago, New York City \
                  and Washington.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  BIKESHARE_DATA_DIR    Directory holding the city CSV files (default: data)\n  \
                  RUST_LOG              Overrides the log filter\n\n\
                  EXAMPLES:\n  \
                  # Interactive session\n  \
                  bikeshare\n\n  \
                  # One report, no prompts\n  \
                  bikeshare --city chicago --month may --day all\n\n  \
                  # Machine-readable report\n  \
                  bikeshare --city washington --json | jq .durations"
)]
struct Args {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    ///
    /// Fields left out take their defaults; flags given here override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// City for a single non-interactive report
    #[arg(long)]
    city: Option<City>,

    /// Month filter for the non-interactive report (january..june or all)
    #[arg(long, requires = "city")]
    month: Option<MonthFilter>,

    /// Day filter for the non-interactive report (monday..sunday or all)
    #[arg(long, requires = "city")]
    day: Option<DayFilter>,

    /// Skip the raw data preview
    #[arg(long)]
    no_preview: bool,

    /// Give up on a prompt after this many invalid answers
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Output the report as JSON to stdout
    ///
    /// Only valid with --city. Disables all logs.
    #[arg(long, requires = "city")]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "error" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<ExplorerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ExplorerConfig::from_json_file(path)?
        }
        None => ExplorerConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    } else if args.config.is_none() {
        config.data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
    }

    if args.no_preview {
        config.show_preview = false;
    }
    if args.max_attempts.is_some() {
        config.max_prompt_attempts = args.max_attempts;
    }

    config.validate()?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn run_batch(args: &Args, config: ExplorerConfig, selection: FilterSelection) -> Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new(config, stdin.lock(), io::stdout());

    if !args.json {
        session.run_once(selection)?;
        return Ok(());
    }

    match session.report(selection) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "error": &e }))?);
            Err(anyhow!("Report failed: {}", e))
        }
    }
}

fn run_interactive(config: ExplorerConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new(config, stdin.lock(), io::stdout());

    match session.run() {
        Ok(iterations) => {
            debug!("Completed {} iteration(s)", iterations);
            Ok(())
        }
        Err(e) if e.is_input_error() => {
            info!("Session stopped waiting for input: {}", e);
            Err(e.into())
        }
        Err(e) => {
            error!("Session failed [{}]: {}", e.error_code(), e);
            Err(e.into())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env first so it can set RUST_LOG and BIKESHARE_DATA_DIR
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    match args.city {
        Some(city) => {
            let selection = FilterSelection::new(
                city,
                args.month.unwrap_or_default(),
                args.day.unwrap_or_default(),
            );
            run_batch(&args, config, selection)
        }
        None => run_interactive(config),
    }
}
