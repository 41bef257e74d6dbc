//! On-demand USD/BRL rate lookup

use super::WebError;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Binance `/api/v3/ticker/price` response
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// Fetches the USDT/BRL price used to show the BTC price in USD
#[derive(Debug, Clone)]
pub struct UsdRateClient {
    client: Client,
    url: String,
}

impl UsdRateClient {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// BRL per USD
    pub async fn fetch_rate(&self) -> Result<Decimal, WebError> {
        let body: TickerPrice = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| WebError::UsdRate(e.to_string()))?
            .json()
            .await
            .map_err(|e| WebError::UsdRate(e.to_string()))?;

        let rate = Decimal::from_str(body.price.trim())
            .map_err(|_| WebError::UsdRate(format!("invalid price {:?}", body.price)))?;
        if rate <= Decimal::ZERO {
            return Err(WebError::UsdRate(format!("non-positive rate {rate}")));
        }
        Ok(rate)
    }
}
