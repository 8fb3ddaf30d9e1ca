//! nsestats core: ticker metadata, provider tables, and the statistics engine.
//!
//! This crate contains everything upstream of the report:
//! - Domain types (tickers, price fields)
//! - Typed `(field, symbol)` price tables with shape validation at construction
//! - Ticker list ingestion from CSV
//! - The Yahoo Finance chart provider and market-suffix handling
//! - Per-symbol statistics (52-week extremes, last-day trailing average)

pub mod data;
pub mod domain;
pub mod stats;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types crossing the fetch fork-join are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::TickerList>();
        require_sync::<domain::TickerList>();
        require_send::<data::PriceTable>();
        require_sync::<data::PriceTable>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<stats::StatSeries>();
        require_sync::<stats::StatSeries>();
    }
}
