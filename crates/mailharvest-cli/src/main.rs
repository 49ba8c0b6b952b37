mod error;

use anyhow::{Context as _, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::error::{exit_code_for, report_error};
use mailharvest_config as config;
use mailharvest_sheets::{harvest, GoogleSheets};

#[derive(Debug, Parser)]
#[command(
    name = "mailharvest",
    version,
    about = "Harvest email addresses from spreadsheet ranges into a roster sheet"
)]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/mailharvest/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        match config::resolve_config_path(cli.config.clone()) {
            Ok(path) => debug!(path = %path.display(), "config resolved"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }
    let app_config = config::load(cli.config).with_context(|| "load config")?;
    debug!(
        workbook = %app_config.workbook,
        sources = app_config.sources.len(),
        "configuration loaded"
    );

    let workbook = GoogleSheets::open(&app_config.credentials, &app_config.workbook)
        .with_context(|| format!("open workbook {:?}", app_config.workbook))?;

    let report = harvest(
        &workbook,
        &app_config.sources,
        &app_config.destination.sheet,
        &app_config.destination.anchor,
    )
    .with_context(|| "harvest email addresses")?;

    println!(
        "Wrote {} addresses to '{}'",
        report.written, report.sheet_title
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
