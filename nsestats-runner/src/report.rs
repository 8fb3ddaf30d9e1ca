//! Report assembly: left-join ticker metadata onto the computed statistics.
//!
//! Metadata drives the join. Every ticker-file row gets exactly one report row,
//! in file order, with null cells where the provider had nothing. A repeated
//! symbol repeats its statistics. Symbols that only appear in the statistics
//! are dropped and reported back.

use chrono::NaiveDateTime;
use nsestats_core::data::tickers::{COMPANY_COLUMN, SYMBOL_COLUMN};
use nsestats_core::domain::TickerList;
use nsestats_core::stats::StatSeries;
use serde::Serialize;
use std::collections::BTreeSet;

/// Timestamp layout embedded in report file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H%M";

/// The three statistic columns, in report order.
#[derive(Debug, Clone)]
pub struct StatColumns {
    pub low_52w: StatSeries,
    pub high_52w: StatSeries,
    pub last_day_avg: StatSeries,
}

impl StatColumns {
    fn all(&self) -> [&StatSeries; 3] {
        [&self.low_52w, &self.high_52w, &self.last_day_avg]
    }

    /// Column headers after `SYMBOL` and `NAME OF COMPANY`.
    pub fn labels(&self) -> [String; 3] {
        self.all().map(|s| s.label().to_string())
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub symbol: String,
    pub company_name: String,
    pub low_52w: Option<f64>,
    pub high_52w: Option<f64>,
    pub last_day_avg_close: Option<f64>,
}

impl ReportRow {
    pub fn stats(&self) -> [Option<f64>; 3] {
        [self.low_52w, self.high_52w, self.last_day_avg_close]
    }
}

/// A fully assembled report, ready for a writer.
#[derive(Debug, Clone)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub generated_at: NaiveDateTime,
    /// In the statistics but not in the ticker list.
    pub dropped_symbols: Vec<String>,
    /// Non-empty ticker symbols absent from every statistic, each listed once.
    pub missing_symbols: Vec<String>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Left-join `tickers` onto `stats`.
pub fn build_report(
    tickers: &TickerList,
    stats: &StatColumns,
    generated_at: NaiveDateTime,
) -> Report {
    let mut headers = vec![SYMBOL_COLUMN.to_string(), COMPANY_COLUMN.to_string()];
    headers.extend(stats.labels());

    let rows = tickers
        .entries()
        .iter()
        .map(|t| ReportRow {
            symbol: t.symbol.clone(),
            company_name: t.company_name.clone(),
            low_52w: stats.low_52w.get(&t.symbol),
            high_52w: stats.high_52w.get(&t.symbol),
            last_day_avg_close: stats.last_day_avg.get(&t.symbol),
        })
        .collect();

    let dropped_symbols = stats
        .all()
        .iter()
        .flat_map(|s| s.symbols())
        .filter(|s| !tickers.contains(s))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let missing_symbols = tickers
        .unique_symbols()
        .into_iter()
        .filter(|symbol| stats.all().iter().all(|s| !s.contains(symbol)))
        .collect();

    Report {
        headers,
        rows,
        generated_at,
        dropped_symbols,
        missing_symbols,
    }
}

/// `NSE_TICKER_STATS` + 2024-03-15 09:47 + `xlsx` → `NSE_TICKER_STATS_2024-03-15-0947.xlsx`
pub fn report_file_name(prefix: &str, generated_at: NaiveDateTime, extension: &str) -> String {
    format!(
        "{prefix}_{}.{extension}",
        generated_at.format(FILE_TIMESTAMP_FORMAT)
    )
}
