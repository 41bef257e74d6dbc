//! Price feed types

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// One decoded ticker update from the feed
///
/// Both fields carry the feed's own values. Nothing here is recomputed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceObservation {
    /// Last traded price in the quote currency
    pub price: Decimal,
    /// Rolling-window (24h) price change percentage as reported by the feed
    pub change_percent: Decimal,
}

impl PriceObservation {
    pub fn new(price: Decimal, change_percent: Decimal) -> Self {
        Self {
            price,
            change_percent,
        }
    }
}

/// Ticker decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Payload is not a ticker object or lacks a required field
    #[error("Malformed ticker payload: {0}")]
    Malformed(String),
    /// A required field is present but its value is unusable
    #[error("Invalid value for field {field:?}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}
