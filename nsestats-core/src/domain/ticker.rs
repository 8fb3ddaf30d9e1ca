use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// One tracked ticker as listed in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMetadata {
    /// Exchange symbol without the market suffix (e.g. `TCS`).
    pub symbol: String,
    pub company_name: String,
}

impl TickerMetadata {
    pub fn new(symbol: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            company_name: company_name.into(),
        }
    }
}

/// The tracked universe in file order, one entry per input row.
///
/// Repeated and blank symbols are kept as rows so the report mirrors the file.
/// Use [`TickerList::unique_symbols`] for what to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerList {
    entries: Vec<TickerMetadata>,
}

impl TickerList {
    pub fn from_entries(entries: impl IntoIterator<Item = TickerMetadata>) -> Self {
        let entries: Vec<TickerMetadata> = entries.into_iter().collect();
        let mut seen = HashSet::new();
        for (row, entry) in entries.iter().enumerate() {
            if entry.symbol.is_empty() {
                warn!(row, "ticker row has an empty symbol");
            } else if !seen.insert(entry.symbol.as_str()) {
                warn!(row, symbol = %entry.symbol, "duplicate ticker row");
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[TickerMetadata] {
        &self.entries
    }

    /// Symbols in file order, one per row.
    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    /// Non-empty symbols in first-seen order, each once.
    pub fn unique_symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.symbol.as_str())
            .filter(|s| !s.is_empty() && seen.insert(*s))
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.iter().any(|e| e.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_is_kept() {
        let list = TickerList::from_entries(vec![
            TickerMetadata::new("TCS", "Tata Consultancy"),
            TickerMetadata::new("INFY", "Infosys"),
            TickerMetadata::new("TCS", "Tata Consultancy Services Ltd"),
            TickerMetadata::new("", "Orphan Row"),
        ]);
        assert_eq!(list.len(), 4);
        assert_eq!(list.symbols(), vec!["TCS", "INFY", "TCS", ""]);
        assert_eq!(list.entries()[2].company_name, "Tata Consultancy Services Ltd");
    }

    #[test]
    fn unique_symbols_skip_repeats_and_blanks() {
        let list = TickerList::from_entries(vec![
            TickerMetadata::new("TCS", "Tata Consultancy"),
            TickerMetadata::new("", "Orphan Row"),
            TickerMetadata::new("INFY", "Infosys"),
            TickerMetadata::new("TCS", "Tata Consultancy Services Ltd"),
        ]);
        assert_eq!(list.unique_symbols(), vec!["TCS", "INFY"]);
    }

    #[test]
    fn contains_matches_exact_symbol() {
        let list = TickerList::from_entries(vec![TickerMetadata::new("INFY", "Infosys")]);
        assert!(list.contains("INFY"));
        assert!(!list.contains("INFY.NS"));
    }
}
