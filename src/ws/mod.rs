//! WebSocket transport
//!
//! The [`Connector`]/[`Connection`] seam lets the feed monitor drive any
//! transport. [`TungsteniteConnector`] is the real one, with a connect timeout
//! and ping/pong keepalive.

mod client;
mod types;

pub use client::{Connection, Connector, TungsteniteConnector};
pub use types::{ConnectionState, WsConfig, WsError, WsFrame, DEFAULT_RECONNECT_DELAY};
