//! Prometheus metrics
//!
//! Investment gauges are written through an injected [`MetricsSink`].
//! Operational feed counters go straight to the `metrics` facade.

use metrics::Gauge;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Investment gauge series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeMetric {
    /// Last traded price
    Price,
    /// 24h price change percentage
    PriceChangePercent,
    /// Amount of the asset held
    AmountHeld,
    /// Current value of holdings
    CurrentValue,
    /// Initial investment (cost basis)
    InitialInvestment,
    /// Profit/loss amount
    Profit,
    /// Profit/loss percentage
    ProfitPercent,
}

impl GaugeMetric {
    pub const ALL: [GaugeMetric; 7] = [
        GaugeMetric::Price,
        GaugeMetric::PriceChangePercent,
        GaugeMetric::AmountHeld,
        GaugeMetric::CurrentValue,
        GaugeMetric::InitialInvestment,
        GaugeMetric::Profit,
        GaugeMetric::ProfitPercent,
    ];

    /// Series name
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::Price => "bitcoin_current_price_brl",
            GaugeMetric::PriceChangePercent => "bitcoin_price_change_percent",
            GaugeMetric::AmountHeld => "bitcoin_amount_held",
            GaugeMetric::CurrentValue | GaugeMetric::InitialInvestment => {
                "bitcoin_investment_value"
            }
            GaugeMetric::Profit => "bitcoin_investment_profit",
            GaugeMetric::ProfitPercent => "bitcoin_investment_profit_percent",
        }
    }

    /// Value of the `type` label, for series that share a name
    pub fn type_label(&self) -> Option<&'static str> {
        match self {
            GaugeMetric::CurrentValue => Some("current"),
            GaugeMetric::InitialInvestment => Some("initial"),
            _ => None,
        }
    }

    fn help(&self) -> &'static str {
        match self {
            GaugeMetric::Price => "Current Bitcoin price in BRL",
            GaugeMetric::PriceChangePercent => "Current price change percentage",
            GaugeMetric::AmountHeld => "Amount of Bitcoin held",
            GaugeMetric::CurrentValue | GaugeMetric::InitialInvestment => {
                "Investment values in BRL"
            }
            GaugeMetric::Profit => "Current profit/loss in BRL",
            GaugeMetric::ProfitPercent => "Current profit/loss percentage",
        }
    }
}

/// Destination for investment gauges
pub trait MetricsSink: Send + Sync {
    fn set_gauge(&self, metric: GaugeMetric, value: f64);
}

/// Sink backed by the `metrics` facade. Handles are registered once, so every
/// update hits the same series.
pub struct PrometheusSink {
    gauges: HashMap<GaugeMetric, Gauge>,
}

impl PrometheusSink {
    /// Register all gauges with the current recorder
    pub fn new() -> Self {
        let mut gauges = HashMap::new();
        for metric in GaugeMetric::ALL {
            metrics::describe_gauge!(metric.name(), metric.help());
            let gauge = match metric.type_label() {
                Some(kind) => metrics::gauge!(metric.name(), "type" => kind),
                None => metrics::gauge!(metric.name()),
            };
            gauges.insert(metric, gauge);
        }
        Self { gauges }
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for PrometheusSink {
    fn set_gauge(&self, metric: GaugeMetric, value: f64) {
        if let Some(gauge) = self.gauges.get(&metric) {
            gauge.set(value);
        }
    }
}

/// Sink that keeps the last value per series in memory
#[derive(Default)]
pub struct InMemorySink {
    state: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    values: HashMap<GaugeMetric, f64>,
    writes: usize,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, metric: GaugeMetric) -> Option<f64> {
        self.state().values.get(&metric).copied()
    }

    /// Total number of gauge writes
    pub fn writes(&self) -> usize {
        self.state().writes
    }
}

impl MetricsSink for InMemorySink {
    fn set_gauge(&self, metric: GaugeMetric, value: f64) {
        let mut state = self.state();
        state.values.insert(metric, value);
        state.writes += 1;
    }
}

/// Feed lifecycle events counted for operators
#[derive(Debug, Clone, Copy)]
pub enum FeedEvent {
    /// Connect attempt started
    ConnectAttempt,
    /// Connect or handshake failed
    ConnectFailure,
    /// Established connection dropped
    Disconnect,
    /// Message decoded and dispatched
    Message,
    /// Message dropped as undecodable
    DecodeFailure,
    /// A consumer failed on an observation
    ConsumerFailure,
}

/// Count a feed event
pub fn record_feed_event(event: FeedEvent) {
    let metric_name = match event {
        FeedEvent::ConnectAttempt => "tracker_feed_connect_attempts_total",
        FeedEvent::ConnectFailure => "tracker_feed_connect_failures_total",
        FeedEvent::Disconnect => "tracker_feed_disconnects_total",
        FeedEvent::Message => "tracker_feed_messages_total",
        FeedEvent::DecodeFailure => "tracker_feed_decode_failures_total",
        FeedEvent::ConsumerFailure => "tracker_consumer_failures_total",
    };

    metrics::counter!(metric_name).increment(1);
}

/// Install the global Prometheus recorder and serve `/metrics` on `addr`
pub fn install_metrics_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}
