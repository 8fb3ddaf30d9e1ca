//! Report pipeline from ticker file to written report.
//!
//! Two entry points:
//! - `Pipeline::run()`: collaborators injected as trait objects. Used by tests.
//! - `run()` / `run_at()`: wires the CSV ticker file, Yahoo provider and the
//!   xlsx writer from a [`ReportConfig`]. Used by the CLI.
//!
//! Every failure is fatal and nothing is written unless all stages succeed.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{info, warn};

use nsestats_core::data::{
    fetch_prices, CsvTickerFile, DataError, FetchRequest, MarketDataProvider, PriceTable,
    TickerError, TickerSource, YahooProvider,
};
use nsestats_core::domain::{PriceField, TickerList};
use nsestats_core::stats::{column_stat, trailing_average_close, Aggregator, StatsError};

use crate::config::{ConfigError, ReportConfig};
use crate::export::{save_report, CsvReportWriter, ReportError, ReportWriter, XlsxReportWriter};
use crate::report::{build_report, Report, StatColumns};

/// Errors from the pipeline, one variant per stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("ticker error: {0}")]
    Tickers(#[from] TickerError),

    #[error("{stage} fetch failed: {source}")]
    Fetch {
        stage: &'static str,
        #[source]
        source: DataError,
    },

    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

/// Coarse failure category, stable across error message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFile,
    MalformedInput,
    ProviderFetch,
    InvalidArgument,
    ShapeMismatch,
    Config,
    Output,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Config(_) => ErrorKind::Config,
            PipelineError::Tickers(TickerError::MissingFile(_)) => ErrorKind::MissingFile,
            PipelineError::Tickers(_) => ErrorKind::MalformedInput,
            PipelineError::Fetch { source, .. } if source.is_shape_mismatch() => {
                ErrorKind::ShapeMismatch
            }
            PipelineError::Fetch { .. } => ErrorKind::ProviderFetch,
            PipelineError::Stats(StatsError::InvalidArgument(_)) => ErrorKind::InvalidArgument,
            // Aggregation over a well-formed table only fails if the column data is unusable.
            PipelineError::Stats(StatsError::Compute { .. }) => ErrorKind::ShapeMismatch,
            PipelineError::Report(_) => ErrorKind::Output,
        }
    }
}

pub const DAILY_STAGE: &str = "52-week daily";
pub const INTRADAY_STAGE: &str = "intraday";
const CLIENT_STAGE: &str = "provider setup";

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ReportResult {
    /// The primary report (xlsx for the stock pipeline).
    pub path: PathBuf,
    /// Companion files from additional writers, in writer order.
    pub extra_paths: Vec<PathBuf>,
    pub report: Report,
}

impl ReportResult {
    pub fn rows(&self) -> usize {
        self.report.len()
    }
}

/// The report pipeline over injected collaborators.
pub struct Pipeline<'a> {
    tickers: &'a dyn TickerSource,
    provider: &'a dyn MarketDataProvider,
    writers: Vec<&'a dyn ReportWriter>,
}

impl<'a> Pipeline<'a> {
    /// `writer` produces the primary report; add companions with [`Pipeline::with_writer`].
    pub fn new(
        tickers: &'a dyn TickerSource,
        provider: &'a dyn MarketDataProvider,
        writer: &'a dyn ReportWriter,
    ) -> Self {
        Self {
            tickers,
            provider,
            writers: vec![writer],
        }
    }

    pub fn with_writer(mut self, writer: &'a dyn ReportWriter) -> Self {
        self.writers.push(writer);
        self
    }

    /// Run every stage. `generated_at` is embedded in the file name.
    pub fn run(
        &self,
        config: &ReportConfig,
        generated_at: NaiveDateTime,
    ) -> Result<ReportResult, PipelineError> {
        config.validate()?;

        info!(source = %self.tickers.describe(), "loading tickers");
        let tickers = self.tickers.load()?;
        info!(tickers = tickers.len(), "tickers loaded");

        let (daily, intraday) = self.fetch_both(config, &tickers)?;

        info!("compiling statistics");
        let stats = StatColumns {
            low_52w: column_stat(&daily, PriceField::Low, Aggregator::Min)?,
            high_52w: column_stat(&daily, PriceField::High, Aggregator::Max)?,
            last_day_avg: trailing_average_close(&intraday, config.intraday_window)?,
        };

        let report = build_report(&tickers, &stats, generated_at);
        if !report.dropped_symbols.is_empty() {
            warn!(
                symbols = ?report.dropped_symbols,
                "provider returned symbols not in the ticker list; dropped"
            );
        }
        if !report.missing_symbols.is_empty() {
            warn!(
                symbols = ?report.missing_symbols,
                "no data returned for tracked symbols; rows left blank"
            );
        }

        let mut paths = Vec::with_capacity(self.writers.len());
        for writer in &self.writers {
            paths.push(save_report(
                *writer,
                &report,
                &config.output_dir,
                &config.file_prefix,
            )?);
        }
        let mut paths = paths.into_iter();
        let path = paths.next().unwrap_or_default();

        Ok(ReportResult {
            path,
            extra_paths: paths.collect(),
            report,
        })
    }

    fn fetch_both(
        &self,
        config: &ReportConfig,
        tickers: &TickerList,
    ) -> Result<(PriceTable, PriceTable), PipelineError> {
        let symbols = tickers.unique_symbols();
        let fetch = |stage: &'static str, request: FetchRequest| {
            fetch_prices(self.provider, &config.market_suffix, &symbols, request)
                .map_err(|source| PipelineError::Fetch { stage, source })
        };

        if config.concurrent_fetch {
            info!(daily = %config.daily, intraday = %config.intraday, "fetching concurrently");
            let (daily, intraday) = rayon::join(
                || fetch(DAILY_STAGE, config.daily),
                || fetch(INTRADAY_STAGE, config.intraday),
            );
            return Ok((daily?, intraday?));
        }

        info!(request = %config.daily, "fetching 52-week daily bars");
        let daily = fetch(DAILY_STAGE, config.daily)?;
        info!(request = %config.intraday, "fetching intraday bars");
        let intraday = fetch(INTRADAY_STAGE, config.intraday)?;
        Ok((daily, intraday))
    }
}

/// Run the stock pipeline stamped with the current local time.
pub fn run(config: &ReportConfig) -> Result<ReportResult, PipelineError> {
    run_at(config, Local::now().naive_local())
}

/// Run the stock pipeline: CSV tickers, Yahoo Finance, xlsx (plus CSV if configured).
pub fn run_at(
    config: &ReportConfig,
    generated_at: NaiveDateTime,
) -> Result<ReportResult, PipelineError> {
    let tickers = CsvTickerFile::new(&config.tickers_path);
    let provider = YahooProvider::new(config.timeout()).map_err(|source| PipelineError::Fetch {
        stage: CLIENT_STAGE,
        source,
    })?;
    let xlsx = XlsxReportWriter;
    let csv = CsvReportWriter;

    let mut pipeline = Pipeline::new(&tickers, &provider, &xlsx);
    if config.csv_copy {
        pipeline = pipeline.with_writer(&csv);
    }
    pipeline.run(config, generated_at)
}
