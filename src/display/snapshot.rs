//! Last-known snapshot for the web page

use crate::dispatch::{Consumer, ConsumerError};
use crate::feed::PriceObservation;
use crate::portfolio::{DerivedMetrics, InvestmentPosition};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

/// Latest observation with the figures derived from it
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub observation: PriceObservation,
    pub position: InvestmentPosition,
    /// `None` when the derived figures overflow
    pub metrics: Option<DerivedMetrics>,
    /// Local time the observation was dispatched
    pub received_at: DateTime<Utc>,
}

/// Receiving half handed to readers
pub type SnapshotReceiver = watch::Receiver<Option<Snapshot>>;

/// Publishes the latest snapshot on a watch channel. Only the newest value is
/// kept; readers never block the stream.
pub struct SnapshotPublisher {
    tx: watch::Sender<Option<Snapshot>>,
}

impl SnapshotPublisher {
    pub fn new() -> (Self, SnapshotReceiver) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.tx.subscribe()
    }
}

impl Consumer for SnapshotPublisher {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn on_observation(
        &self,
        observation: &PriceObservation,
        position: &InvestmentPosition,
    ) -> Result<(), ConsumerError> {
        self.tx.send_replace(Some(Snapshot {
            observation: *observation,
            position: *position,
            metrics: DerivedMetrics::compute(observation, position).ok(),
            received_at: Utc::now(),
        }));
        Ok(())
    }
}
