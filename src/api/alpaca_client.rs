//! Alpaca trading API client: account, positions, assets, and orders.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{OrderAck, OrderIntent, Position, PositionLookup};

use super::types::*;
use super::Broker;

/// Trading API base URLs
pub const PAPER_URL: &str = "https://paper-api.alpaca.markets";
pub const LIVE_URL: &str = "https://api.alpaca.markets";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Alpaca trading API.
pub struct AlpacaClient {
    http: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
}

impl AlpacaClient {
    /// Create a new client against the paper or live endpoint.
    pub fn new(api_key: &str, secret_key: &str, paper: bool) -> Result<Self> {
        let base_url = if paper { PAPER_URL } else { LIVE_URL };
        Self::with_base_url(api_key, secret_key, base_url.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(api_key: &str, secret_key: &str, base_url: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
    }

    /// Get the account.
    pub async fn get_account(&self) -> Result<AccountResponse> {
        let url = format!("{}/v2/account", self.base_url);
        debug!(url = %url, "Fetching account");

        let resp = self
            .authed(self.http.get(&url))
            .send()
            .await
            .context("Failed to fetch account")?;

        let resp = ensure_success(resp, "Account request").await?;
        resp.json().await.context("Failed to parse account response")
    }

    /// Get the open position for a symbol, if any.
    pub async fn get_position(&self, symbol: &str) -> Result<Option<PositionResponse>> {
        let url = format!("{}/v2/positions/{}", self.base_url, symbol);
        debug!(url = %url, "Fetching position");

        let resp = self
            .authed(self.http.get(&url))
            .send()
            .await
            .context("Failed to fetch position")?;

        // Alpaca answers 404 (code 40410000) when nothing is open
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resp = ensure_success(resp, "Position request").await?;
        let position = resp
            .json()
            .await
            .context("Failed to parse position response")?;

        Ok(Some(position))
    }

    /// Get asset details for a symbol.
    pub async fn get_asset(&self, symbol: &str) -> Result<AssetResponse> {
        let url = format!("{}/v2/assets/{}", self.base_url, symbol);
        debug!(url = %url, "Fetching asset");

        let resp = self
            .authed(self.http.get(&url))
            .send()
            .await
            .context("Failed to fetch asset")?;

        let resp = ensure_success(resp, "Asset request").await?;
        resp.json().await.context("Failed to parse asset response")
    }

    /// Place a market order.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse> {
        let url = format!("{}/v2/orders", self.base_url);

        let resp = self
            .authed(self.http.post(&url))
            .json(request)
            .send()
            .await
            .context("Failed to submit order")?;

        let resp = ensure_success(resp, "Order placement").await?;
        resp.json().await.context("Failed to parse order response")
    }

    /// Liquidate a position.
    pub async fn delete_position(&self, symbol: &str) -> Result<OrderResponse> {
        let url = format!("{}/v2/positions/{}", self.base_url, symbol);

        let resp = self
            .authed(self.http.delete(&url))
            .send()
            .await
            .context("Failed to close position")?;

        let resp = ensure_success(resp, "Position close").await?;
        resp.json().await.context("Failed to parse close response")
    }
}

#[async_trait]
impl Broker for AlpacaClient {
    async fn get_open_position(&self, symbol: &str) -> Result<PositionLookup> {
        let position = self.get_position(symbol).await?;
        Ok(PositionLookup::from(position.map(Position::from)))
    }

    async fn get_account_equity(&self) -> Result<Decimal> {
        let account = self.get_account().await?;
        debug!(
            account = %account.id,
            status = %account.status,
            equity = %account.equity,
            buying_power = ?account.buying_power,
            "Account loaded"
        );
        Ok(account.equity)
    }

    async fn is_shortable(&self, symbol: &str) -> Result<bool> {
        let asset = self.get_asset(symbol).await?;
        debug!(
            symbol = %asset.symbol,
            class = %asset.class,
            tradable = asset.tradable,
            shortable = asset.shortable,
            easy_to_borrow = asset.easy_to_borrow,
            "Asset loaded"
        );
        Ok(asset.tradable && asset.shortable)
    }

    async fn submit_order(&self, intent: &OrderIntent) -> Result<OrderAck> {
        let request = CreateOrderRequest::market(intent);
        let order = self.create_order(&request).await?;

        info!(
            order_id = %order.id,
            client_order_id = %order.client_order_id,
            symbol = %order.symbol,
            status = %order.status,
            "Order accepted"
        );

        Ok(OrderAck { id: order.id })
    }

    async fn close_position(&self, symbol: &str) -> Result<()> {
        let order = self.delete_position(symbol).await?;
        info!(order_id = %order.id, symbol = %symbol, "Close order accepted");
        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying Alpaca's message.
pub(super) async fn ensure_success(resp: Response, what: &str) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| format!("{} ({})", e.message, e.code))
        .unwrap_or(body);

    anyhow::bail!("{} failed: {} - {}", what, status, message);
}
