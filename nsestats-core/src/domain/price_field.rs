use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Price column carried by a provider table.
///
/// The display form matches the provider's column headers ("Adj Close" has a space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl PriceField {
    pub const ALL: [PriceField; 6] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::AdjClose,
        PriceField::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::AdjClose => "Adj Close",
            PriceField::Volume => "Volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price field '{0}' (expected one of Open, High, Low, Close, Adj Close, Volume)")]
pub struct ParseFieldError(pub String);

impl FromStr for PriceField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(PriceField::Open),
            "High" => Ok(PriceField::High),
            "Low" => Ok(PriceField::Low),
            "Close" => Ok(PriceField::Close),
            "Adj Close" | "AdjClose" => Ok(PriceField::AdjClose),
            "Volume" => Ok(PriceField::Volume),
            other => Err(ParseFieldError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parses_back() {
        for field in PriceField::ALL {
            assert_eq!(field.to_string().parse::<PriceField>(), Ok(field));
        }
    }

    #[test]
    fn adj_close_accepts_both_spellings() {
        assert_eq!("AdjClose".parse::<PriceField>(), Ok(PriceField::AdjClose));
        assert_eq!("Adj Close".parse::<PriceField>(), Ok(PriceField::AdjClose));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        assert!("low".parse::<PriceField>().is_err());
        assert!("Dividends".parse::<PriceField>().is_err());
    }
}
