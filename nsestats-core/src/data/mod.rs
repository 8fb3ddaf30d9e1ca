//! Data ingestion: ticker lists, provider tables, Yahoo Finance

pub mod align;
pub mod download;
pub mod provider;
pub mod suffix;
pub mod table;
pub mod tickers;
pub mod yahoo;

pub use align::{align_series, SymbolSeries};
pub use download::fetch_prices;
pub use provider::{DataError, FetchRequest, Interval, MarketDataProvider, Period};
pub use suffix::MarketSuffix;
pub use table::{ColumnKey, PriceTable, RawColumn, ShapeError, Timestamp};
pub use tickers::{load_tickers, CsvTickerFile, TickerError, TickerSource};
pub use yahoo::YahooProvider;
