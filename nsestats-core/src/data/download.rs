//! Batch fetch through a provider with market-suffix handling.

use super::provider::{DataError, FetchRequest, MarketDataProvider};
use super::suffix::MarketSuffix;
use super::table::PriceTable;
use tracing::{debug, info};

/// Fetch a batch of bare symbols.
///
/// Symbols are suffixed before the provider sees them and stripped again on
/// the returned table, so callers only ever deal in bare symbols.
pub fn fetch_prices(
    provider: &dyn MarketDataProvider,
    suffix: &MarketSuffix,
    symbols: &[String],
    request: FetchRequest,
) -> Result<PriceTable, DataError> {
    let query: Vec<String> = symbols.iter().map(|s| suffix.apply(s)).collect();
    debug!(provider = provider.name(), %request, symbols = ?query, "fetching batch");

    let table = provider.fetch(&query, request)?;
    info!(
        provider = provider.name(),
        %request,
        rows = table.len(),
        symbols = table.symbols().len(),
        "batch fetched"
    );

    Ok(table.map_symbols(|s| suffix.strip(s).to_string())?)
}
