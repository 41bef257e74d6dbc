//! Telemetry module
//!
//! Logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{
    install_metrics_exporter, record_feed_event, FeedEvent, GaugeMetric, InMemorySink,
    MetricsSink, PrometheusSink,
};

use crate::config::TelemetryConfig;

/// Initialize logging and the metrics exporter
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;
    install_metrics_exporter(config.metrics_bind)?;
    Ok(())
}
