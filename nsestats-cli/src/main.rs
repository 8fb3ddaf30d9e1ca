//! nsestats CLI: generate the NSE ticker statistics report.
//!
//! With no arguments: reads `TICKERS.csv`, fetches one year of daily bars and
//! one day of minute bars from Yahoo Finance, and writes
//! `REPORTS/NSE_TICKER_STATS_<YYYY-MM-DD>-<HHMM>.xlsx`.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use nsestats_runner::{run_at, ReportConfig};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "nsestats",
    about = "NSE ticker statistics report generator (52-week low/high, last-day average close)"
)]
struct Cli {
    /// TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker CSV with SYMBOL and NAME OF COMPANY columns.
    #[arg(long)]
    tickers: Option<PathBuf>,

    /// Directory the report is written to.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Per-request HTTP timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Fetch daily and intraday bars concurrently.
    #[arg(long, default_value_t = false)]
    concurrent: bool,

    /// Also write a CSV copy of the report.
    #[arg(long, default_value_t = false)]
    csv: bool,
}

impl Cli {
    fn into_config(self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ReportConfig::default(),
        };

        if let Some(tickers) = self.tickers {
            config.tickers_path = tickers;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        config.concurrent_fetch |= self.concurrent;
        config.csv_copy |= self.csv;

        config.validate()?;
        Ok(config)
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nsestats=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let config = Cli::parse().into_config()?;
    let started = Local::now().naive_local();

    println!();
    println!("######################################");
    println!("NSE TICKER STATISTICS REPORT GENERATOR");
    println!();
    println!("Date/Time: {started}");
    println!("######################################");
    println!();

    let result = match run_at(&config, started) {
        Ok(result) => result,
        Err(e) => {
            error!(kind = ?e.kind(), "report generation failed");
            return Err(e.into());
        }
    };

    info!(rows = result.rows(), path = %result.path.display(), "report saved");
    println!("Report: {} ({} tickers)", result.path.display(), result.rows());
    for extra in &result.extra_paths {
        println!("Copy:   {}", extra.display());
    }
    if !result.report.missing_symbols.is_empty() {
        println!(
            "No data for {} ticker(s): {}",
            result.report.missing_symbols.len(),
            result.report.missing_symbols.join(", ")
        );
    }

    println!();
    println!("##############################");
    println!("NSE REPORT GENERATION COMPLETE");
    println!("##############################");
    println!();

    Ok(())
}
