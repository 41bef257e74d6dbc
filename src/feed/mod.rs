//! Price feed module
//!
//! Decodes the Binance ticker stream and keeps the connection to it alive.

mod binance;
mod monitor;
mod types;

pub use binance::decode_ticker;
pub use monitor::{FeedMonitor, MonitorStats};
pub use types::{DecodeError, PriceObservation};
