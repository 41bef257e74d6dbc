//! Feed connection manager
//!
//! Owns one logical connection to the ticker endpoint and keeps it alive for
//! as long as the cancellation token is not triggered:
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> (read error / remote close) -> Disconnected
//!                     |                                                        ^
//!                     +---------------- handshake failure ---------------------+
//! ```
//!
//! Every drop back to `Disconnected` is followed by the same fixed delay before
//! the next attempt. Retries never stop. Undecodable messages are skipped
//! without touching the connection.

use super::decode_ticker;
use crate::dispatch::Dispatcher;
use crate::telemetry::{record_feed_event, FeedEvent};
use crate::ws::{Connection, ConnectionState, Connector, WsConfig, WsError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Counters accumulated over a monitor's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Connect attempts started
    pub connect_attempts: u64,
    /// Connections successfully established
    pub connections: u64,
    /// Messages decoded and dispatched
    pub messages: u64,
    /// Messages dropped as undecodable
    pub decode_failures: u64,
}

/// Why a read loop ended
enum ReadOutcome {
    Cancelled,
    RemoteClosed,
    Failed(WsError),
}

/// Reconnecting read loop driving decode and dispatch
pub struct FeedMonitor {
    connector: Box<dyn Connector>,
    config: WsConfig,
    dispatcher: Dispatcher,
    state_tx: watch::Sender<ConnectionState>,
    stats: MonitorStats,
}

impl FeedMonitor {
    pub fn new(connector: impl Connector + 'static, config: WsConfig, dispatcher: Dispatcher) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            connector: Box::new(connector),
            config,
            dispatcher,
            state_tx,
            stats: MonitorStats::default(),
        }
    }

    /// Observe connection state transitions
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Run until `cancel` fires
    pub async fn run(mut self, cancel: CancellationToken) -> MonitorStats {
        tracing::info!(url = %self.config.url, "Starting feed monitor");

        while !cancel.is_cancelled() {
            self.set_state(ConnectionState::Connecting);
            self.stats.connect_attempts += 1;
            record_feed_event(FeedEvent::ConnectAttempt);
            tracing::info!(
                url = %self.config.url,
                attempt = self.stats.connect_attempts,
                "Connecting to feed"
            );

            let connected = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.connector.connect(&self.config.url) => result,
            };

            match connected {
                Ok(mut conn) => {
                    self.stats.connections += 1;
                    self.set_state(ConnectionState::Connected);
                    tracing::info!(url = %self.config.url, "Feed connected");

                    match self.read_loop(conn.as_mut(), &cancel).await {
                        ReadOutcome::Cancelled => {
                            self.set_state(ConnectionState::Closing);
                            conn.close().await;
                            break;
                        }
                        ReadOutcome::RemoteClosed => {
                            record_feed_event(FeedEvent::Disconnect);
                            tracing::warn!("Feed closed by remote end");
                        }
                        ReadOutcome::Failed(e) => {
                            record_feed_event(FeedEvent::Disconnect);
                            tracing::warn!(error = %e, "Feed read error");
                        }
                    }
                }
                Err(e) => {
                    record_feed_event(FeedEvent::ConnectFailure);
                    tracing::warn!(
                        error = %e,
                        attempt = self.stats.connect_attempts,
                        "Feed connection failed"
                    );
                }
            }

            self.set_state(ConnectionState::Disconnected);
            tracing::info!(delay = ?self.config.reconnect_delay, "Reconnecting after delay");

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::info!(
            connect_attempts = self.stats.connect_attempts,
            connections = self.stats.connections,
            messages = self.stats.messages,
            decode_failures = self.stats.decode_failures,
            "Feed monitor stopped"
        );
        self.stats
    }

    async fn read_loop(
        &mut self,
        conn: &mut dyn Connection,
        cancel: &CancellationToken,
    ) -> ReadOutcome {
        loop {
            let frame = tokio::select! {
                biased;
                _ = cancel.cancelled() => return ReadOutcome::Cancelled,
                frame = conn.next_frame() => frame,
            };

            match frame {
                Ok(Some(frame)) => self.handle_payload(frame.payload()),
                Ok(None) => return ReadOutcome::RemoteClosed,
                Err(e) => return ReadOutcome::Failed(e),
            }
        }
    }

    fn handle_payload(&mut self, payload: &[u8]) {
        match decode_ticker(payload) {
            Ok(observation) => {
                self.stats.messages += 1;
                record_feed_event(FeedEvent::Message);

                let report = self.dispatcher.dispatch(&observation);
                for _ in 0..report.failed {
                    record_feed_event(FeedEvent::ConsumerFailure);
                }
            }
            Err(e) => {
                self.stats.decode_failures += 1;
                record_feed_event(FeedEvent::DecodeFailure);
                tracing::warn!(
                    error = %e,
                    payload = %String::from_utf8_lossy(payload),
                    "Dropping undecodable feed message"
                );
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "Feed state changed");
        }
    }
}
