use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use dartwatch::{telemetry, AppConfig, CheckError, ValueUpChecker};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "DART Value-Up Checker",
    about = "Poll DART for new value-up plan disclosures and notify via CSV, email, and Slack",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one polling pass over the watch list (default command)
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
struct CheckArgs {
    /// Override the configured companies file
    #[arg(long)]
    companies_file: Option<PathBuf>,
    /// Override the directory holding the cache, seen-state, and CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the lookback window length in days
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    lookback_days: Option<i64>,
    /// Evaluation date for the run (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), CheckError> {
    let cli = Cli::parse();
    let Command::Check(args) = cli
        .command
        .unwrap_or_else(|| Command::Check(CheckArgs::default()));
    run_check(args).await
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

async fn run_check(mut args: CheckArgs) -> Result<(), CheckError> {
    let mut config = AppConfig::load()?;

    if let Some(dir) = args.data_dir.take() {
        config.companies_file = dir.join("companies.txt");
        config.data_dir = dir;
    }
    if let Some(path) = args.companies_file.take() {
        config.companies_file = path;
    }
    if let Some(days) = args.lookback_days.take() {
        config.lookback_days = days;
    }

    telemetry::init(&config.telemetry)?;

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    info!(%today, lookback_days = config.lookback_days, "DART value-up plan checker starting run");

    let checker = ValueUpChecker::from_config(config);
    let summary = checker.run(today).await?;

    info!(
        companies = summary.companies,
        skipped = summary.skipped,
        evaluated = summary.evaluated,
        new_matches = summary.new_matches,
        "run complete"
    );
    Ok(())
}
