//! Binance 24h ticker decoding
//!
//! The `<symbol>@ticker` stream pushes one JSON object per update. Only the
//! last price (`c`) and the price change percent (`P`) are used. Both arrive as
//! strings and are parsed into [`Decimal`] so no float rounding enters the
//! pipeline.

use super::{DecodeError, PriceObservation};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Binance 24hr ticker message, reduced to the fields the tracker consumes.
/// Everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct BinanceTickerMessage {
    /// Last price
    #[serde(rename = "c")]
    last_price: String,
    /// Price change percent
    #[serde(rename = "P")]
    price_change_percent: String,
}

/// Decode one raw feed payload into a [`PriceObservation`]
pub fn decode_ticker(payload: &[u8]) -> Result<PriceObservation, DecodeError> {
    let ticker: BinanceTickerMessage =
        serde_json::from_slice(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let price = parse_field("c", &ticker.last_price)?;
    if price <= Decimal::ZERO {
        return Err(DecodeError::InvalidField {
            field: "c",
            value: ticker.last_price,
        });
    }
    let change_percent = parse_field("P", &ticker.price_change_percent)?;

    Ok(PriceObservation {
        price,
        change_percent,
    })
}

fn parse_field(field: &'static str, text: &str) -> Result<Decimal, DecodeError> {
    Decimal::from_str(text.trim()).map_err(|_| DecodeError::InvalidField {
        field,
        value: text.to_string(),
    })
}
