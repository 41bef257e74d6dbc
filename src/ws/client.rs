//! WebSocket transport over tokio-tungstenite

use super::types::{WsConfig, WsError, WsFrame};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};

/// Opens connections to a feed endpoint
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect and complete the handshake
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, WsError>;
}

/// One established connection
#[async_trait]
pub trait Connection: Send {
    /// Wait for the next data frame.
    ///
    /// `Ok(None)` means the remote end closed the connection.
    async fn next_frame(&mut self) -> Result<Option<WsFrame>, WsError>;

    /// Close the connection, best effort
    async fn close(&mut self);
}

/// Production connector with connect timeout and ping/pong keepalive
#[derive(Debug, Clone)]
pub struct TungsteniteConnector {
    connect_timeout: Duration,
    ping_interval: Duration,
}

impl TungsteniteConnector {
    pub fn new(connect_timeout: Duration, ping_interval: Duration) -> Self {
        Self {
            connect_timeout,
            ping_interval,
        }
    }

    pub fn from_config(config: &WsConfig) -> Self {
        Self::new(config.connect_timeout, config.ping_interval)
    }
}

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, WsError> {
        let (stream, _response) = tokio::time::timeout(self.connect_timeout, connect_async(url))
            .await
            .map_err(|_| WsError::ConnectTimeout(self.connect_timeout))?
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        let mut ping_interval =
            interval_at(Instant::now() + self.ping_interval, self.ping_interval);
        ping_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Ok(Box::new(TungsteniteConnection {
            stream,
            ping_interval,
            waiting_for_pong: false,
        }))
    }
}

struct TungsteniteConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    ping_interval: Interval,
    waiting_for_pong: bool,
}

#[async_trait]
impl Connection for TungsteniteConnection {
    async fn next_frame(&mut self) -> Result<Option<WsFrame>, WsError> {
        loop {
            tokio::select! {
                msg = self.stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => return Ok(Some(WsFrame::Text(text))),
                        Some(Ok(Message::Binary(data))) => return Ok(Some(WsFrame::Binary(data))),
                        Some(Ok(Message::Ping(data))) => {
                            self.stream.send(Message::Pong(data)).await
                                .map_err(|e| WsError::SendFailed(e.to_string()))?;
                        }
                        Some(Ok(Message::Pong(_))) => {
                            self.waiting_for_pong = false;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::debug!(?frame, "Received close frame");
                            return Ok(None);
                        }
                        Some(Ok(Message::Frame(_))) => {}
                        Some(Err(e)) => return Err(WsError::ReadFailed(e.to_string())),
                        None => return Err(WsError::ReadFailed("Stream ended unexpectedly".into())),
                    }
                }

                _ = self.ping_interval.tick() => {
                    if self.waiting_for_pong {
                        return Err(WsError::ReadFailed("Pong timeout".into()));
                    }
                    self.stream.send(Message::Ping(Vec::new())).await
                        .map_err(|e| WsError::SendFailed(e.to_string()))?;
                    self.waiting_for_pong = true;
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "Error while closing WebSocket");
        }
    }
}
