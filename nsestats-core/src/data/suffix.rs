use serde::{Deserialize, Serialize};

/// Exchange suffix appended to symbols when talking to the provider (`.NS` for NSE).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketSuffix(String);

impl MarketSuffix {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }

    pub fn nse() -> Self {
        Self::new(".NS")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `TCS` → `TCS.NS`
    pub fn apply(&self, symbol: &str) -> String {
        format!("{symbol}{}", self.0)
    }

    /// `TCS.NS` → `TCS`. Symbols without the suffix pass through unchanged.
    pub fn strip<'a>(&self, symbol: &'a str) -> &'a str {
        symbol.strip_suffix(self.0.as_str()).unwrap_or(symbol)
    }
}

impl Default for MarketSuffix {
    fn default() -> Self {
        Self::nse()
    }
}
