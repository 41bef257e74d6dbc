//! Metrics projection consumer

use super::{DerivedMetrics, InvestmentPosition};
use crate::dispatch::{Consumer, ConsumerError};
use crate::feed::PriceObservation;
use crate::telemetry::{GaugeMetric, MetricsSink};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Derives investment figures from each observation and writes them to a sink
pub struct MetricsProjection {
    sink: Arc<dyn MetricsSink>,
}

impl MetricsProjection {
    pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
        Self { sink }
    }

    /// Compute derived metrics and push every series to the sink.
    ///
    /// The observed series are written even when the derived figures overflow.
    pub fn project(
        &self,
        observation: &PriceObservation,
        position: &InvestmentPosition,
    ) -> Result<DerivedMetrics, ConsumerError> {
        self.write(&[
            (GaugeMetric::Price, observation.price),
            (GaugeMetric::PriceChangePercent, observation.change_percent),
            (GaugeMetric::AmountHeld, position.amount_held),
            (GaugeMetric::InitialInvestment, position.cost_basis),
        ])?;

        let metrics = DerivedMetrics::compute(observation, position)
            .map_err(|e| ConsumerError::failed(e.to_string()))?;
        self.write(&[
            (GaugeMetric::CurrentValue, metrics.current_value),
            (GaugeMetric::Profit, metrics.profit),
            (GaugeMetric::ProfitPercent, metrics.profit_percent),
        ])?;

        Ok(metrics)
    }

    /// Convert the whole group before writing, so a bad value never leaves it
    /// half-updated
    fn write(&self, values: &[(GaugeMetric, Decimal)]) -> Result<(), ConsumerError> {
        let mut converted = Vec::with_capacity(values.len());
        for &(metric, value) in values {
            converted.push((metric, to_gauge_value(metric, value)?));
        }
        for (metric, value) in converted {
            self.sink.set_gauge(metric, value);
        }
        Ok(())
    }
}

fn to_gauge_value(metric: GaugeMetric, value: Decimal) -> Result<f64, ConsumerError> {
    value
        .to_f64()
        .ok_or_else(|| ConsumerError::failed(format!("{} not representable: {}", metric.name(), value)))
}

impl Consumer for MetricsProjection {
    fn name(&self) -> &str {
        "metrics-projection"
    }

    fn on_observation(
        &self,
        observation: &PriceObservation,
        position: &InvestmentPosition,
    ) -> Result<(), ConsumerError> {
        self.project(observation, position).map(|_| ())
    }
}
