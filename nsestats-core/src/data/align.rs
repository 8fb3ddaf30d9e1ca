//! Multi-symbol time alignment.
//!
//! Given per-symbol series, align them to a common timeline. A symbol with no
//! bar at a timestamp gets a null cell (no forward-fill at this stage).

use super::table::{PriceTable, RawColumn, ShapeError, Timestamp};
use crate::domain::PriceField;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Bars for one symbol as parsed from a provider response.
#[derive(Debug, Clone, Default)]
pub struct SymbolSeries {
    pub symbol: String,
    /// Bar timestamps, one per row of each field vector.
    pub timestamps: Vec<Timestamp>,
    pub fields: BTreeMap<PriceField, Vec<Option<f64>>>,
}

impl SymbolSeries {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }
}

/// Align several symbols onto the union of their timestamps.
///
/// Columns are emitted with a `[field, symbol]` header and go through
/// [`PriceTable::from_raw`], so the result carries the usual shape checks.
/// If a symbol repeats a timestamp, the first bar wins.
pub fn align_series(series: Vec<SymbolSeries>) -> Result<PriceTable, ShapeError> {
    let all: BTreeSet<Timestamp> = series
        .iter()
        .flat_map(|s| s.timestamps.iter().copied())
        .collect();
    let index: Vec<Timestamp> = all.into_iter().collect();
    let position: HashMap<Timestamp, usize> =
        index.iter().enumerate().map(|(i, ts)| (*ts, i)).collect();

    let mut raw = Vec::new();
    for s in &series {
        let mut first_row: HashMap<Timestamp, usize> = HashMap::new();
        for (row, ts) in s.timestamps.iter().enumerate() {
            first_row.entry(*ts).or_insert(row);
        }

        for (field, values) in &s.fields {
            let mut aligned = vec![None; index.len()];
            for (ts, row) in &first_row {
                aligned[position[ts]] = values.get(*row).copied().flatten();
            }
            raw.push(RawColumn::new(
                vec![field.as_str().to_string(), s.symbol.clone()],
                aligned,
            ));
        }
    }

    PriceTable::from_raw(index, raw)
}
