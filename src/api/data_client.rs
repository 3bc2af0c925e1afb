//! Alpaca market data client: latest trade and quote prices.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, warn};

use super::alpaca_client::ensure_success;
use super::types::*;
use super::PriceFeed;

const DATA_API_BASE: &str = "https://data.alpaca.markets";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Alpaca market data API (read-only operations).
pub struct MarketDataClient {
    client: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
}

impl MarketDataClient {
    /// Create a new data client with default settings.
    pub fn new(api_key: &str, secret_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, secret_key, DATA_API_BASE.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(api_key: &str, secret_key: &str, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Fetch the latest trade print for a stock.
    pub async fn get_latest_trade(&self, symbol: &str) -> Result<Option<TradeData>> {
        let url = format!("{}/v2/stocks/{}/trades/latest", self.base_url, symbol);
        debug!(url = %url, "Fetching latest trade");

        let response = self
            .client
            .get(&url)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
            .send()
            .await
            .context("Failed to fetch latest trade")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = ensure_success(response, "Latest trade request").await?;
        let body: LatestTradeResponse = response
            .json()
            .await
            .context("Failed to parse latest trade response")?;

        Ok(Some(body.trade))
    }

    /// Fetch the latest quote for a stock.
    pub async fn get_latest_quote(&self, symbol: &str) -> Result<QuoteData> {
        let url = format!("{}/v2/stocks/{}/quotes/latest", self.base_url, symbol);
        debug!(url = %url, "Fetching latest quote");

        let response = self
            .client
            .get(&url)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
            .send()
            .await
            .context("Failed to fetch latest quote")?;

        let response = ensure_success(response, "Latest quote request").await?;
        let body: LatestQuoteResponse = response
            .json()
            .await
            .context("Failed to parse latest quote response")?;

        Ok(body.quote)
    }
}

#[async_trait]
impl PriceFeed for MarketDataClient {
    /// Last trade price, or the quote when no usable trade is available.
    async fn latest_price(&self, symbol: &str) -> Result<Decimal> {
        match self.get_latest_trade(symbol).await {
            Ok(Some(trade)) if trade.price > Decimal::ZERO => {
                debug!(symbol = %symbol, price = %trade.price, at = %trade.timestamp, "Using latest trade");
                return Ok(trade.price);
            }
            Ok(_) => debug!(symbol = %symbol, "No usable trade print, trying quote"),
            Err(e) => warn!(symbol = %symbol, error = %e, "Latest trade failed, trying quote"),
        }

        let quote = self.get_latest_quote(symbol).await?;
        quote
            .reference_price()
            .with_context(|| format!("No price available for {}", symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path, http::StatusCode as HttpStatus, response::IntoResponse, routing::get, Json,
        Router,
    };
    use rust_decimal_macros::dec;
    use serde_json::json;

    /// Serves a trade print for SPY only; every symbol has a quote, QQQ an empty one.
    async fn fake_data_api() -> String {
        async fn trade(Path(symbol): Path<String>) -> impl IntoResponse {
            if symbol == "SPY" {
                (
                    HttpStatus::OK,
                    Json(json!({
                        "symbol": "SPY",
                        "trade": {"t": "2024-01-02T15:00:00Z", "p": 472.65},
                    })),
                )
            } else {
                (HttpStatus::NOT_FOUND, Json(json!({"message": "not found"})))
            }
        }

        async fn quote(Path(symbol): Path<String>) -> impl IntoResponse {
            let (ap, bp) = if symbol == "QQQ" { (0, 0) } else { (21, 19) };
            Json(json!({"symbol": symbol, "quote": {"ap": ap, "bp": bp}}))
        }

        let app = Router::new()
            .route("/v2/stocks/:symbol/trades/latest", get(trade))
            .route("/v2/stocks/:symbol/quotes/latest", get(quote));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_latest_price_prefers_trade() {
        let client = MarketDataClient::with_base_url("k", "s", fake_data_api().await).unwrap();
        assert_eq!(client.latest_price("SPY").await.unwrap(), dec!(472.65));
    }

    #[tokio::test]
    async fn test_latest_price_falls_back_to_quote_midpoint() {
        let client = MarketDataClient::with_base_url("k", "s", fake_data_api().await).unwrap();
        assert_eq!(client.latest_price("IWM").await.unwrap(), dec!(20));
    }

    #[tokio::test]
    async fn test_no_trade_and_empty_quote_is_error() {
        let client = MarketDataClient::with_base_url("k", "s", fake_data_api().await).unwrap();
        let err = client.latest_price("QQQ").await.unwrap_err();
        assert!(err.to_string().contains("No price available for QQQ"));
    }
}
