//! parkstat - Fetch parking transaction statistics, filter by time range, and chart in the terminal

mod api;
mod filter;
mod types;
mod utils;

use anyhow::Context;
use api::{resolve_base_url, resolve_token, BackendClient, ConfigFile, StatisticsSource, TOKEN_ENV};
use chrono::{Local, NaiveTime};
use clap::{Parser, Subcommand};
use colored::Colorize;
use types::{ClockWindow, OutputFormat, TimeRangeSelection};
use utils::format::{print_banner, print_doctor_results, render, Report};
use utils::paths;

#[derive(Parser)]
#[command(name = "parkstat")]
#[command(author, version, about = "Fetch parking transaction statistics, filter by time range, and chart in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Time range to show
    #[arg(short, long, value_enum, default_value = "today")]
    range: TimeRangeSelection,

    /// Start of the display clock window, HH:MM (only shown with --range today)
    #[arg(long, default_value = "08:00", value_parser = parse_clock)]
    from: NaiveTime,

    /// End of the display clock window, HH:MM (only shown with --range today)
    #[arg(long, default_value = "11:59", value_parser = parse_clock)]
    to: NaiveTime,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Backend base URL (defaults to the production host)
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for the statistics endpoint
    #[arg(long)]
    token: Option<String>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check credential sources and endpoint configuration
    Doctor,
}

fn parse_clock(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| format!("expected HH:MM, got {s:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Doctor) => run_doctor(&cli),
        None => run_report(&cli).await,
    }
}

async fn run_report(cli: &Cli) -> anyhow::Result<()> {
    // Only show banner for table format
    if matches!(cli.format, OutputFormat::Table) {
        print_banner();
    }

    let config = ConfigFile::load();
    let env_token = std::env::var(TOKEN_ENV).ok();
    let token = resolve_token(cli.token.as_deref(), env_token.as_deref(), &config)?;
    let base_url = resolve_base_url(cli.base_url.as_deref(), &config);

    let client = BackendClient::new(&base_url);
    if cli.verbose {
        println!("{} {}", "Endpoint:".dimmed(), client.statistics_url().dimmed());
    }

    let stats = client
        .fetch_statistics(&token)
        .await
        .context("fetching statistics")?;

    let now = Local::now().naive_local();
    let filtered = filter::filter_records(&stats.transaksi, cli.range, now);

    let clock_window = (cli.range == TimeRangeSelection::Today).then_some(ClockWindow {
        start: cli.from,
        end: cli.to,
    });

    let report = Report {
        records: &filtered,
        total: stats.total_transaksi,
        selection: cli.range,
        clock_window,
    };

    println!("{}", render(&report, cli.format));

    Ok(())
}

fn run_doctor(cli: &Cli) -> anyhow::Result<()> {
    print_banner();
    println!("{}\n", "Running diagnostics...".cyan());

    let config = ConfigFile::load();
    let config_path = paths::config_file();
    let env_token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());

    let mut checks: Vec<(String, String, bool)> = Vec::new();
    checks.push((
        "--token flag".to_string(),
        if cli.token.is_some() {
            "provided".to_string()
        } else {
            "not provided".to_string()
        },
        cli.token.is_some(),
    ));
    checks.push((
        format!("{} environment variable", TOKEN_ENV),
        if env_token.is_some() {
            "set".to_string()
        } else {
            "not set".to_string()
        },
        env_token.is_some(),
    ));
    checks.push((
        "config file".to_string(),
        config_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "home directory not found".to_string()),
        config_path.as_ref().map(|p| p.exists()).unwrap_or(false),
    ));
    checks.push((
        "config file token".to_string(),
        if config.token.is_some() {
            "present".to_string()
        } else {
            "absent".to_string()
        },
        config.token.is_some(),
    ));

    print_doctor_results(&checks);

    let base_url = resolve_base_url(cli.base_url.as_deref(), &config);
    println!(
        "{} {}",
        "Resolved endpoint:".bold(),
        BackendClient::new(&base_url).statistics_url()
    );

    match resolve_token(cli.token.as_deref(), env_token.as_deref(), &config) {
        Ok(_) => println!("{} {}", "Credential:".bold(), "resolved".green()),
        Err(e) => println!("{} {}", "Credential:".bold(), e.to_string().yellow()),
    }
    println!();

    Ok(())
}
