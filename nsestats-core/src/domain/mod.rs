//! Domain types: tracked tickers and the price fields a provider can return.

pub mod price_field;
pub mod ticker;

pub use price_field::{ParseFieldError, PriceField};
pub use ticker::{TickerList, TickerMetadata};
