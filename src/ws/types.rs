//! WebSocket types and configuration

use std::time::Duration;
use thiserror::Error;

/// Fixed delay between reconnection attempts
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// WebSocket client configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket URL to connect to
    pub url: String,
    /// Delay before every reconnection attempt (fixed, no backoff growth)
    pub reconnect_delay: Duration,
    /// Upper bound on a single connect + handshake
    pub connect_timeout: Duration,
    /// Interval for sending keepalive ping frames
    pub ping_interval: Duration,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            connect_timeout: Duration::from_secs(10),
            ping_interval: Duration::from_secs(30),
        }
    }
}

impl WsConfig {
    /// Create a new config with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the reconnection delay
    pub fn reconnect_delay(mut self, d: Duration) -> Self {
        self.reconnect_delay = d;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.connect_timeout = d;
        self
    }

    /// Set ping interval
    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = d;
        self
    }
}

/// Data frame received from the server. Control frames are handled by the
/// connection and never surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsFrame {
    /// Text message
    Text(String),
    /// Binary message
    Binary(Vec<u8>),
}

impl WsFrame {
    /// Raw payload bytes
    pub fn payload(&self) -> &[u8] {
        match self {
            WsFrame::Text(text) => text.as_bytes(),
            WsFrame::Binary(data) => data,
        }
    }
}

/// Lifecycle of the logical feed connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Only reached on shutdown
    Closing,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closing => "closing",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WebSocket errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WsError {
    /// Connect or handshake failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Connect did not complete in time
    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),
    /// Established connection broke while reading
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Send failed
    #[error("Send failed: {0}")]
    SendFailed(String),
}

impl WsError {
    /// True for errors raised before a connection was established
    pub fn is_connect_error(&self) -> bool {
        matches!(
            self,
            WsError::ConnectionFailed(_) | WsError::ConnectTimeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_config_default() {
        let config = WsConfig::default();
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.ping_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_ws_config_builder() {
        let config = WsConfig::new("wss://example.com")
            .reconnect_delay(Duration::from_millis(500))
            .connect_timeout(Duration::from_secs(3))
            .ping_interval(Duration::from_secs(15));

        assert_eq!(config.url, "wss://example.com");
        assert_eq!(config.reconnect_delay, Duration::from_millis(500));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.ping_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_ws_error_display() {
        let err = WsError::ConnectionFailed("timeout".to_string());
        assert_eq!(err.to_string(), "Connection failed: timeout");

        let err = WsError::ReadFailed("reset by peer".to_string());
        assert_eq!(err.to_string(), "Read failed: reset by peer");
    }

    #[test]
    fn test_ws_error_classification() {
        assert!(WsError::ConnectionFailed("x".into()).is_connect_error());
        assert!(WsError::ConnectTimeout(Duration::from_secs(1)).is_connect_error());
        assert!(!WsError::ReadFailed("x".into()).is_connect_error());
        assert!(!WsError::SendFailed("x".into()).is_connect_error());
    }

    #[test]
    fn test_frame_payload() {
        assert_eq!(WsFrame::Text("hi".into()).payload(), b"hi");
        assert_eq!(WsFrame::Binary(vec![1, 2]).payload(), &[1, 2]);
    }

    #[test]
    fn test_connection_state_default() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
    }
}
