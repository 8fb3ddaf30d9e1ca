//! Per-symbol summary statistics over provider tables.
//!
//! - 52-week column statistic: one aggregate per symbol over the full daily range.
//! - Last trading-day average: forward-fill intraday closes, take the trailing
//!   window, average per symbol.
//!
//! Nulls are skipped by every aggregate. A symbol whose column is entirely null
//! still gets an entry, with a null value. Values are not rounded.

use crate::data::PriceTable;
use crate::domain::PriceField;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency used in statistic labels (NSE quotes in rupees).
pub const CURRENCY: &str = "INR";

/// Intraday observations averaged for the last-day price.
pub const DEFAULT_INTRADAY_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("aggregation failed for {symbol}: {reason}")]
    Compute { symbol: String, reason: String },
}

/// Aggregate applied over a symbol's column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Aggregator {
    Min,
    Max,
    Mean,
    Median,
}

impl Aggregator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregator::Min => "min",
            Aggregator::Max => "max",
            Aggregator::Mean => "mean",
            Aggregator::Median => "median",
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregator {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(Aggregator::Min),
            "max" => Ok(Aggregator::Max),
            "mean" => Ok(Aggregator::Mean),
            "median" => Ok(Aggregator::Median),
            other => Err(StatsError::InvalidArgument(format!(
                "unknown aggregator '{other}' (expected one of min, max, mean, median)"
            ))),
        }
    }
}

/// Labelled symbol → value mapping produced by one statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSeries {
    label: String,
    values: BTreeMap<String, Option<f64>>,
}

impl StatSeries {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn insert(&mut self, symbol: impl Into<String>, value: Option<f64>) {
        self.values.insert(symbol.into(), value);
    }

    /// Value for `symbol`; `None` if absent or null.
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.values.get(symbol).copied().flatten()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.values.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Label for a 52-week column statistic, e.g. `52w Low (INR)`.
pub fn fifty_two_week_label(field: PriceField) -> String {
    format!("52w {field} ({CURRENCY})")
}

/// Label for the last trading-day average close.
pub fn last_day_average_label() -> String {
    format!("Last 1d Avg Close ({CURRENCY})")
}

/// 52-week statistic with string arguments, validated before the table is read.
///
/// `field` must name a [`PriceField`] and `aggregator` one of min/max/mean/median.
pub fn fifty_two_week_extreme(
    table: &PriceTable,
    field: &str,
    aggregator: &str,
) -> Result<StatSeries, StatsError> {
    let field: PriceField = field
        .parse()
        .map_err(|e: crate::domain::ParseFieldError| StatsError::InvalidArgument(e.to_string()))?;
    let aggregator: Aggregator = aggregator.parse()?;
    column_stat(table, field, aggregator)
}

/// Apply `aggregator` to every `field` column over the full row range.
pub fn column_stat(
    table: &PriceTable,
    field: PriceField,
    aggregator: Aggregator,
) -> Result<StatSeries, StatsError> {
    let mut out = StatSeries::new(fifty_two_week_label(field));
    for (symbol, values) in table.field_columns(field) {
        let series = Series::new(symbol.into(), values);
        out.insert(symbol, aggregate(symbol, &series, aggregator)?);
    }
    Ok(out)
}

/// Mean of the last [`DEFAULT_INTRADAY_WINDOW`] forward-filled closes per symbol.
pub fn last_trading_day_average_price(table: &PriceTable) -> Result<StatSeries, StatsError> {
    trailing_average_close(table, DEFAULT_INTRADAY_WINDOW)
}

/// Mean of the last `window` forward-filled closes per symbol.
///
/// Leading gaps stay null after the fill and are skipped by the mean. With
/// fewer than `window` rows, every row is used.
pub fn trailing_average_close(
    table: &PriceTable,
    window: usize,
) -> Result<StatSeries, StatsError> {
    if window == 0 {
        return Err(StatsError::InvalidArgument(
            "trailing window must be at least 1".into(),
        ));
    }

    let mut out = StatSeries::new(last_day_average_label());
    for (symbol, values) in table.field_columns(PriceField::Close) {
        let filled = Series::new(symbol.into(), values)
            .fill_null(FillNullStrategy::Forward(None))
            .map_err(|e| compute_error(symbol, e))?;
        out.insert(symbol, filled.tail(Some(window)).mean());
    }
    Ok(out)
}

fn aggregate(
    symbol: &str,
    series: &Series,
    aggregator: Aggregator,
) -> Result<Option<f64>, StatsError> {
    match aggregator {
        Aggregator::Min => series.min::<f64>().map_err(|e| compute_error(symbol, e)),
        Aggregator::Max => series.max::<f64>().map_err(|e| compute_error(symbol, e)),
        Aggregator::Mean => Ok(series.mean()),
        Aggregator::Median => Ok(series.median()),
    }
}

fn compute_error(symbol: &str, e: PolarsError) -> StatsError {
    StatsError::Compute {
        symbol: symbol.to_string(),
        reason: e.to_string(),
    }
}
