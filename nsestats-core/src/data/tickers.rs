//! Ticker list ingestion from a delimited file.
//!
//! The file needs a `SYMBOL` and a `NAME OF COMPANY` column; anything else is
//! ignored. Headers are matched after trimming, since exchange equity lists
//! ship headers like `" SERIES"`. All cells are read as text.

use crate::domain::{TickerList, TickerMetadata};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const SYMBOL_COLUMN: &str = "SYMBOL";
pub const COMPANY_COLUMN: &str = "NAME OF COMPANY";

#[derive(Debug, Error)]
pub enum TickerError {
    #[error("ticker file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("ticker file {source_name} is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    #[error("failed to read ticker file {source_name}: {reason}")]
    Unreadable { source_name: String, reason: String },
}

/// Where the tracked universe comes from.
pub trait TickerSource: Send + Sync {
    /// Short description for logs (usually a path).
    fn describe(&self) -> String;

    fn load(&self) -> Result<TickerList, TickerError>;
}

/// Ticker list stored as a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvTickerFile {
    path: PathBuf,
}

impl CsvTickerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TickerSource for CsvTickerFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<TickerList, TickerError> {
        load_tickers(&self.path)
    }
}

/// Read a ticker CSV into the tracked universe.
pub fn load_tickers(path: &Path) -> Result<TickerList, TickerError> {
    if !path.is_file() {
        return Err(TickerError::MissingFile(path.to_path_buf()));
    }

    let source_name = path.display().to_string();
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(|e| unreadable(&source_name, e))?;

    let list = tickers_from_frame(&df, &source_name)?;
    info!(path = %source_name, tickers = list.len(), "ticker list loaded");
    Ok(list)
}

/// Extract `(symbol, company)` pairs from an already-parsed frame.
///
/// Every data row becomes one entry, in file order. Cells are trimmed and a
/// missing symbol or company name becomes "".
pub fn tickers_from_frame(df: &DataFrame, source_name: &str) -> Result<TickerList, TickerError> {
    let symbols = text_column(df, SYMBOL_COLUMN, source_name)?;
    let names = text_column(df, COMPANY_COLUMN, source_name)?;
    let symbols = symbols.str().map_err(|e| unreadable(source_name, e))?;
    let names = names.str().map_err(|e| unreadable(source_name, e))?;

    let mut entries = Vec::with_capacity(df.height());
    for (symbol, name) in symbols.into_iter().zip(names.into_iter()) {
        let symbol = symbol.map(str::trim).unwrap_or_default();
        let name = name.map(str::trim).unwrap_or_default();
        entries.push(TickerMetadata::new(symbol, name));
    }

    Ok(TickerList::from_entries(entries))
}

/// Find a column by trimmed header name and cast it to text.
fn text_column(df: &DataFrame, name: &str, source_name: &str) -> Result<Series, TickerError> {
    let column = df
        .get_columns()
        .iter()
        .find(|c| c.name().as_str().trim() == name)
        .ok_or_else(|| TickerError::MissingColumn {
            source_name: source_name.to_string(),
            column: name.to_string(),
        })?;
    column
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| unreadable(source_name, e))
}

fn unreadable(source_name: &str, e: PolarsError) -> TickerError {
    TickerError::Unreadable {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_symbols_in_file_order() {
        let file = write_csv(
            "SYMBOL,NAME OF COMPANY,SERIES\n\
             TCS,Tata Consultancy Services Limited,EQ\n\
             INFY,Infosys Limited,EQ\n",
        );

        let list = load_tickers(file.path()).unwrap();

        assert_eq!(list.symbols(), vec!["TCS", "INFY"]);
        assert_eq!(list.entries()[1].company_name, "Infosys Limited");
    }

    #[test]
    fn headers_are_matched_after_trimming() {
        let file = write_csv(
            "SYMBOL, NAME OF COMPANY , SERIES\n\
             M&M,\"Mahindra & Mahindra Limited\", EQ\n",
        );

        let list = load_tickers(file.path()).unwrap();

        assert_eq!(list.symbols(), vec!["M&M"]);
        assert_eq!(list.entries()[0].company_name, "Mahindra & Mahindra Limited");
    }

    #[test]
    fn numeric_looking_symbols_stay_verbatim() {
        let file = write_csv("SYMBOL,NAME OF COMPANY\n0001,Zero One Ltd\n");
        let list = load_tickers(file.path()).unwrap();
        assert_eq!(list.symbols(), vec!["0001"]);
    }

    #[test]
    fn empty_symbol_rows_are_kept() {
        let file = write_csv(
            "SYMBOL,NAME OF COMPANY\n\
             TCS,Tata Consultancy\n\
             ,Orphan Row\n\
             INFY,\n",
        );

        let list = load_tickers(file.path()).unwrap();

        assert_eq!(list.symbols(), vec!["TCS", "", "INFY"]);
        assert_eq!(list.entries()[1].company_name, "Orphan Row");
        assert_eq!(list.entries()[2].company_name, "");
        assert_eq!(list.unique_symbols(), vec!["TCS", "INFY"]);
    }

    #[test]
    fn one_entry_per_data_row() {
        let file = write_csv(
            "SYMBOL,NAME OF COMPANY\n\
             TCS,Tata Consultancy\n\
             TCS,Tata Consultancy Services Limited\n\
             ,Orphan Row\n\
             INFY,Infosys Limited\n",
        );

        let list = load_tickers(file.path()).unwrap();

        assert_eq!(list.len(), 4);
        assert_eq!(list.symbols(), vec!["TCS", "TCS", "", "INFY"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TICKERS.csv");

        match load_tickers(&path) {
            Err(TickerError::MissingFile(p)) => assert_eq!(p, path),
            other => panic!("expected MissingFile, got: {other:?}"),
        }
    }

    #[test]
    fn missing_symbol_column_is_reported() {
        let file = write_csv("TICKER,NAME OF COMPANY\nTCS,Tata Consultancy\n");

        match load_tickers(file.path()) {
            Err(TickerError::MissingColumn { column, .. }) => assert_eq!(column, SYMBOL_COLUMN),
            other => panic!("expected MissingColumn, got: {other:?}"),
        }
    }

    #[test]
    fn missing_company_column_is_reported() {
        let file = write_csv("SYMBOL,COMPANY\nTCS,Tata Consultancy\n");

        match load_tickers(file.path()) {
            Err(TickerError::MissingColumn { column, .. }) => assert_eq!(column, COMPANY_COLUMN),
            other => panic!("expected MissingColumn, got: {other:?}"),
        }
    }

    #[test]
    fn frame_with_duplicate_symbols_keeps_both_rows() {
        let df = df!(
            "SYMBOL" => &["TCS", "TCS"],
            "NAME OF COMPANY" => &["First", "Second"],
        )
        .unwrap();

        let list = tickers_from_frame(&df, "inline").unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.entries()[0].company_name, "First");
        assert_eq!(list.entries()[1].company_name, "Second");
    }
}
