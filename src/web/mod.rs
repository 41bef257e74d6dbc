//! Tracker web page
//!
//! | Method | Path      | Description                                  |
//! |--------|-----------|----------------------------------------------|
//! | GET    | `/`       | Self-refreshing investment summary (HTML)    |
//! | GET    | `/health` | Feed state and snapshot presence (JSON)      |
//!
//! The page reflects the last observation seen on the stream. The only value
//! fetched per request is the optional USD rate.

mod error;
mod page;
mod rates;

pub use error::WebError;
pub use page::{render, PageView};
pub use rates::UsdRateClient;

use crate::display::SnapshotReceiver;
use crate::portfolio::InvestmentPosition;
use crate::ws::ConnectionState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::{Html, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// State shared by the handlers
#[derive(Clone)]
pub struct WebState {
    inner: Arc<Inner>,
}

struct Inner {
    position: InvestmentPosition,
    snapshot: SnapshotReceiver,
    feed_state: watch::Receiver<ConnectionState>,
    usd_rates: Option<UsdRateClient>,
    refresh_secs: u64,
}

impl WebState {
    pub fn new(
        position: InvestmentPosition,
        snapshot: SnapshotReceiver,
        feed_state: watch::Receiver<ConnectionState>,
        usd_rates: Option<UsdRateClient>,
        refresh_secs: u64,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                position,
                snapshot,
                feed_state,
                usd_rates,
                refresh_secs,
            }),
        }
    }
}

/// Build the router
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .layer(middleware::from_fn(access_log))
        .with_state(state)
}

/// Serve until `cancel` fires
pub async fn serve(listener: TcpListener, state: WebState, cancel: CancellationToken) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Web server listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { cancel.cancelled().await })
    .await?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn home(State(state): State<WebState>) -> Result<Html<String>, WebError> {
    let inner = &state.inner;
    let snapshot = inner.snapshot.borrow().clone();
    let feed_state = *inner.feed_state.borrow();

    let price_usd = match (&snapshot, &inner.usd_rates) {
        (Some(snapshot), Some(rates)) => {
            let rate = rates.fetch_rate().await?;
            let usd = snapshot
                .observation
                .price
                .checked_div(rate)
                .ok_or_else(|| WebError::UsdRate(format!("rate {rate} overflows the USD price")))?;
            Some(usd)
        }
        _ => None,
    };

    Ok(Html(render(&PageView {
        position: &inner.position,
        snapshot: snapshot.as_ref(),
        price_usd,
        feed_state,
        refresh_secs: inner.refresh_secs,
    })))
}

async fn health(State(state): State<WebState>) -> Json<Value> {
    let feed_state = *state.inner.feed_state.borrow();
    let last_update = state.inner.snapshot.borrow().as_ref().map(|s| s.received_at);

    Json(json!({
        "status": "ok",
        "feed": feed_state.as_str(),
        "has_snapshot": last_update.is_some(),
        "last_update": last_update,
    }))
}

/// Client address, honouring proxy headers
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    ["x-real-ip", "x-forwarded-for"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|p| p.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(request.headers(), peer);

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        ip = %ip,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "HTTP request"
    );
    response
}
