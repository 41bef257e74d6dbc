//! Investment position and derived metrics
//!
//! Turns each observation plus the configured position into current value,
//! profit and profit percent, and projects them onto the metrics sink.

mod projection;
mod types;

pub use projection::MetricsProjection;
pub use types::{DerivedMetrics, InvestmentPosition, MetricsOverflow};
