//! Observation dispatch
//!
//! Delivers every decoded [`PriceObservation`] to a fixed, ordered set of
//! consumers. A failing or panicking consumer is contained and logged. It never
//! stops the consumers after it or the stream that drives the dispatcher.

use crate::feed::PriceObservation;
use crate::portfolio::InvestmentPosition;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Consumer failures, as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsumerError {
    /// Consumer reported a failure
    #[error("{0}")]
    Failed(String),
    /// Consumer panicked while handling the observation
    #[error("panicked: {0}")]
    Panicked(String),
}

impl ConsumerError {
    pub fn failed(reason: impl Into<String>) -> Self {
        ConsumerError::Failed(reason.into())
    }
}

/// Something that wants every observation
pub trait Consumer: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Handle one observation. Called from the stream task, so keep it short.
    fn on_observation(
        &self,
        observation: &PriceObservation,
        position: &InvestmentPosition,
    ) -> Result<(), ConsumerError>;
}

/// Outcome of a single dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Consumers that returned Ok
    pub delivered: usize,
    /// Consumers that failed or panicked
    pub failed: usize,
}

/// Sequential fan-out to registered consumers
pub struct Dispatcher {
    position: InvestmentPosition,
    consumers: Vec<Box<dyn Consumer>>,
}

impl Dispatcher {
    /// Create a dispatcher with no consumers
    pub fn new(position: InvestmentPosition) -> Self {
        Self {
            position,
            consumers: Vec::new(),
        }
    }

    /// Register a consumer. Delivery order is registration order.
    pub fn register(&mut self, consumer: Box<dyn Consumer>) {
        tracing::debug!(consumer = consumer.name(), "Registered consumer");
        self.consumers.push(consumer);
    }

    /// Builder form of [`Dispatcher::register`]
    pub fn with_consumer(mut self, consumer: impl Consumer + 'static) -> Self {
        self.register(Box::new(consumer));
        self
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Deliver one observation to every consumer, in order
    pub fn dispatch(&self, observation: &PriceObservation) -> DispatchReport {
        let mut report = DispatchReport::default();

        for consumer in &self.consumers {
            let result = catch_unwind(AssertUnwindSafe(|| {
                consumer.on_observation(observation, &self.position)
            }))
            .unwrap_or_else(|panic| Err(ConsumerError::Panicked(panic_message(&*panic))));

            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        consumer = consumer.name(),
                        error = %e,
                        price = %observation.price,
                        "Consumer failed to handle observation"
                    );
                }
            }
        }

        report
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
