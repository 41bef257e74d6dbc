//! Configuration types for btc-tracker

use crate::portfolio::InvestmentPosition;
use crate::telemetry::LogFormat;
use crate::ws::WsConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors. Fatal, and only raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML or misses a section
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is present but unusable
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    pub position: PositionConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Ticker feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Streaming ticker endpoint
    pub url: String,
    /// Fixed delay before each reconnect
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Keepalive ping interval
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
    /// Connect + handshake timeout
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_reconnect_delay_secs() -> u64 {
    5
}
fn default_ping_interval_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}

/// Investment position. Both fields are required.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionConfig {
    /// Amount of BTC held
    pub amount_held: Decimal,
    /// Amount originally invested, in BRL
    pub cost_basis: Decimal,
}

/// Web page configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_bind")]
    pub bind: SocketAddr,
    /// Page auto-refresh interval
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Optional USDT/BRL price endpoint, fetched on each page render
    #[serde(default)]
    pub usd_rate_url: Option<String>,
}

fn default_web_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
fn default_refresh_secs() -> u64 {
    10
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_web_bind(),
            refresh_secs: default_refresh_secs(),
            usd_rate_url: None,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_metrics_bind")]
    pub metrics_bind: SocketAddr,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_metrics_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 2112))
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_bind: default_metrics_bind(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Environment variables that override file values
pub const ENV_BTC_AMOUNT: &str = "BTC_AMOUNT";
pub const ENV_INVESTMENT: &str = "INVESTMENT_BRL";
pub const ENV_FEED_URL: &str = "FEED_URL";
pub const ENV_USD_RATE_URL: &str = "BINANCE_USDT_API_URL";

impl Config {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_toml(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without overrides or validation
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from `lookup` (normally the process environment)
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup(ENV_BTC_AMOUNT) {
            self.position.amount_held = parse_decimal(ENV_BTC_AMOUNT, &v)?;
        }
        if let Some(v) = lookup(ENV_INVESTMENT) {
            self.position.cost_basis = parse_decimal(ENV_INVESTMENT, &v)?;
        }
        if let Some(v) = lookup(ENV_FEED_URL) {
            self.feed.url = v;
        }
        if let Some(v) = lookup(ENV_USD_RATE_URL) {
            self.web.usd_rate_url = Some(v).filter(|s| !s.trim().is_empty());
        }
        Ok(())
    }

    /// Check invariants the rest of the program relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.feed.url.trim();
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::invalid(
                "feed.url",
                format!("expected ws:// or wss:// URL, got {url:?}"),
            ));
        }
        if self.feed.reconnect_delay_secs == 0 {
            return Err(ConfigError::invalid("feed.reconnect_delay_secs", "must be positive"));
        }
        if self.feed.connect_timeout_secs == 0 {
            return Err(ConfigError::invalid("feed.connect_timeout_secs", "must be positive"));
        }
        if self.feed.ping_interval_secs == 0 {
            return Err(ConfigError::invalid("feed.ping_interval_secs", "must be positive"));
        }
        if self.position.amount_held < Decimal::ZERO {
            return Err(ConfigError::invalid("position.amount_held", "must not be negative"));
        }
        if self.position.cost_basis < Decimal::ZERO {
            return Err(ConfigError::invalid("position.cost_basis", "must not be negative"));
        }
        if self.web.refresh_secs == 0 {
            return Err(ConfigError::invalid("web.refresh_secs", "must be positive"));
        }
        Ok(())
    }

    pub fn position(&self) -> InvestmentPosition {
        InvestmentPosition::new(self.position.amount_held, self.position.cost_basis)
    }

    pub fn ws_config(&self) -> WsConfig {
        WsConfig::new(self.feed.url.trim())
            .reconnect_delay(Duration::from_secs(self.feed.reconnect_delay_secs))
            .connect_timeout(Duration::from_secs(self.feed.connect_timeout_secs))
            .ping_interval(Duration::from_secs(self.feed.ping_interval_secs))
    }
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim())
        .map_err(|e| ConfigError::invalid(field, format!("{value:?} is not a number: {e}")))
}
