//! Typed price table keyed by `(field, symbol)` columns over a time index.
//!
//! Providers hand back columns with a two-level header (`[field, symbol]`).
//! The header is validated when the table is built, so a flat or otherwise
//! malformed response fails here instead of producing wrong aggregates later.

use crate::domain::PriceField;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

pub type Timestamp = DateTime<Utc>;

/// Column key: one price field for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey {
    pub field: PriceField,
    pub symbol: String,
}

impl ColumnKey {
    pub fn new(field: PriceField, symbol: impl Into<String>) -> Self {
        Self {
            field,
            symbol: symbol.into(),
        }
    }
}

/// A column as delivered by a provider, before header validation.
#[derive(Debug, Clone)]
pub struct RawColumn {
    pub header: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl RawColumn {
    pub fn new(header: Vec<String>, values: Vec<Option<f64>>) -> Self {
        Self { header, values }
    }
}

/// Shape violations in a provider table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("column header {header:?} has {levels} level(s), expected 2 (field, symbol)")]
    NotTwoLevel { header: Vec<String>, levels: usize },

    #[error("unknown price field '{0}' in column header")]
    UnknownField(String),

    #[error("column {field}/{symbol} has {actual} rows but the index has {expected}")]
    LengthMismatch {
        field: PriceField,
        symbol: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column {field}/{symbol}")]
    DuplicateColumn { field: PriceField, symbol: String },

    #[error("time index is not strictly ascending at row {0}")]
    UnsortedIndex(usize),
}

/// Price table with a strictly ascending time index.
///
/// Every column has exactly one (nullable) value per index row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    index: Vec<Timestamp>,
    columns: BTreeMap<ColumnKey, Vec<Option<f64>>>,
}

impl PriceTable {
    /// Build a table from provider columns, validating the two-level header.
    pub fn from_raw(index: Vec<Timestamp>, raw: Vec<RawColumn>) -> Result<Self, ShapeError> {
        let mut columns = Vec::with_capacity(raw.len());
        for column in raw {
            if column.header.len() != 2 {
                return Err(ShapeError::NotTwoLevel {
                    levels: column.header.len(),
                    header: column.header,
                });
            }
            let field: PriceField = column.header[0]
                .parse()
                .map_err(|_| ShapeError::UnknownField(column.header[0].clone()))?;
            let symbol = column.header[1].clone();
            columns.push((ColumnKey::new(field, symbol), column.values));
        }
        Self::from_columns(index, columns)
    }

    /// Build a table from already-typed columns.
    pub fn from_columns(
        index: Vec<Timestamp>,
        columns: impl IntoIterator<Item = (ColumnKey, Vec<Option<f64>>)>,
    ) -> Result<Self, ShapeError> {
        if let Some(pos) = index.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ShapeError::UnsortedIndex(pos + 1));
        }

        let mut map = BTreeMap::new();
        for (key, values) in columns {
            if values.len() != index.len() {
                return Err(ShapeError::LengthMismatch {
                    field: key.field,
                    symbol: key.symbol,
                    expected: index.len(),
                    actual: values.len(),
                });
            }
            if map.contains_key(&key) {
                return Err(ShapeError::DuplicateColumn {
                    field: key.field,
                    symbol: key.symbol,
                });
            }
            map.insert(key, values);
        }

        Ok(Self {
            index,
            columns: map,
        })
    }

    /// Number of index rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Distinct symbols across all fields, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.columns.keys().map(|k| k.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    pub fn column(&self, field: PriceField, symbol: &str) -> Option<&[Option<f64>]> {
        self.columns
            .get(&ColumnKey::new(field, symbol))
            .map(|v| v.as_slice())
    }

    /// All columns for one field, as `(symbol, values)` pairs sorted by symbol.
    pub fn field_columns(
        &self,
        field: PriceField,
    ) -> impl Iterator<Item = (&str, &[Option<f64>])> + '_ {
        self.columns
            .iter()
            .filter(move |(key, _)| key.field == field)
            .map(|(key, values)| (key.symbol.as_str(), values.as_slice()))
    }

    /// Rename every symbol. Two symbols mapping to the same name is a shape error.
    pub fn map_symbols(self, rename: impl Fn(&str) -> String) -> Result<Self, ShapeError> {
        let columns = self
            .columns
            .into_iter()
            .map(|(key, values)| (ColumnKey::new(key.field, rename(&key.symbol)), values))
            .collect::<Vec<_>>();
        Self::from_columns(self.index, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 15, 4, minute, 0).unwrap()
    }

    fn header(field: &str, symbol: &str) -> Vec<String> {
        vec![field.to_string(), symbol.to_string()]
    }

    #[test]
    fn from_raw_accepts_two_level_headers() {
        let table = PriceTable::from_raw(
            vec![ts(0), ts(1)],
            vec![
                RawColumn::new(header("Close", "TCS.NS"), vec![Some(1.0), Some(2.0)]),
                RawColumn::new(header("Adj Close", "TCS.NS"), vec![Some(1.0), None]),
            ],
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.symbols(), vec!["TCS.NS"]);
        assert_eq!(
            table.column(PriceField::AdjClose, "TCS.NS"),
            Some(&[Some(1.0), None][..])
        );
    }

    #[test]
    fn flat_header_is_rejected() {
        let err = PriceTable::from_raw(
            vec![ts(0)],
            vec![RawColumn::new(vec!["Close".into()], vec![Some(1.0)])],
        )
        .unwrap_err();
        assert!(matches!(err, ShapeError::NotTwoLevel { levels: 1, .. }));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = PriceTable::from_raw(
            vec![ts(0)],
            vec![RawColumn::new(header("TCS.NS", "Close"), vec![Some(1.0)])],
        )
        .unwrap_err();
        assert_eq!(err, ShapeError::UnknownField("TCS.NS".into()));
    }

    #[test]
    fn column_length_must_match_index() {
        let err = PriceTable::from_raw(
            vec![ts(0), ts(1)],
            vec![RawColumn::new(header("Low", "INFY.NS"), vec![Some(1.0)])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ShapeError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn unsorted_index_is_rejected() {
        let err = PriceTable::from_columns(vec![ts(2), ts(1)], Vec::new()).unwrap_err();
        assert_eq!(err, ShapeError::UnsortedIndex(1));
    }

    #[test]
    fn field_columns_filters_by_field() {
        let table = PriceTable::from_raw(
            vec![ts(0)],
            vec![
                RawColumn::new(header("Low", "TCS"), vec![Some(1.0)]),
                RawColumn::new(header("High", "TCS"), vec![Some(3.0)]),
                RawColumn::new(header("Low", "INFY"), vec![Some(2.0)]),
            ],
        )
        .unwrap();

        let lows: Vec<&str> = table.field_columns(PriceField::Low).map(|(s, _)| s).collect();
        assert_eq!(lows, vec!["INFY", "TCS"]);
    }

    #[test]
    fn map_symbols_detects_collisions() {
        let table = PriceTable::from_raw(
            vec![ts(0)],
            vec![
                RawColumn::new(header("Close", "TCS.NS"), vec![Some(1.0)]),
                RawColumn::new(header("Close", "TCS.BO"), vec![Some(2.0)]),
            ],
        )
        .unwrap();

        let err = table
            .map_symbols(|s| s.split('.').next().unwrap_or(s).to_string())
            .unwrap_err();
        assert!(matches!(err, ShapeError::DuplicateColumn { .. }));
    }
}
