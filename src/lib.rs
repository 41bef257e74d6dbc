//! btc-tracker: Bitcoin investment tracker
//!
//! This library provides the core components for:
//! - Real-time ticker feed from Binance with fixed-delay reconnection
//! - Ticker message decoding
//! - Ordered, failure-contained dispatch to consumers
//! - Investment metrics projected onto Prometheus gauges
//! - Console reporting and a self-refreshing web page
//! - Logging and metrics telemetry

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod feed;
pub mod portfolio;
pub mod telemetry;
pub mod web;
pub mod ws;
