//! Request and response types for the Alpaca trading and market data APIs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OrderIntent, OrderSize, Position};

/// Account response from `GET /v2/account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub equity: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub buying_power: Option<Decimal>,
}

/// Position response from `GET /v2/positions/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    #[serde(default)]
    pub side: String,
}

impl From<PositionResponse> for Position {
    fn from(p: PositionResponse) -> Self {
        Position {
            symbol: p.symbol,
            qty: p.qty,
            side: p.side,
        }
    }
}

/// Asset response from `GET /v2/assets/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetResponse {
    pub symbol: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub tradable: bool,
    #[serde(default)]
    pub shortable: bool,
    #[serde(default)]
    pub easy_to_borrow: bool,
}

/// Body of `POST /v2/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub symbol: String,
    pub side: &'static str,
    #[serde(rename = "type")]
    pub order_type: &'static str,
    pub time_in_force: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<String>,
    pub client_order_id: String,
}

impl CreateOrderRequest {
    /// Market order for an intent, with a fresh client order id.
    pub fn market(intent: &OrderIntent) -> Self {
        let (notional, qty) = match intent.size {
            OrderSize::Notional(n) => (Some(n.to_string()), None),
            OrderSize::Quantity(q) => (None, Some(q.to_string())),
        };

        Self {
            symbol: intent.symbol.clone(),
            side: intent.side.as_str(),
            order_type: "market",
            time_in_force: intent.time_in_force.as_str(),
            notional,
            qty,
            client_order_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Order response from `POST /v2/orders` and `DELETE /v2/positions/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    #[serde(default)]
    pub client_order_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub symbol: String,
}

/// Error body Alpaca returns with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Response from `GET /v2/stocks/{symbol}/trades/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestTradeResponse {
    pub trade: TradeData,
}

/// A single trade print. Alpaca abbreviates field names.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeData {
    /// Price
    #[serde(rename = "p")]
    pub price: Decimal,
    /// Timestamp
    #[serde(rename = "t", default)]
    pub timestamp: String,
}

/// Response from `GET /v2/stocks/{symbol}/quotes/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestQuoteResponse {
    pub quote: QuoteData,
}

/// Top of book quote.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteData {
    #[serde(rename = "ap", default)]
    pub ask_price: Decimal,
    #[serde(rename = "bp", default)]
    pub bid_price: Decimal,
}

impl QuoteData {
    /// Midpoint when both sides are quoted, otherwise whichever side is.
    pub fn reference_price(&self) -> Option<Decimal> {
        let ask = self.ask_price;
        let bid = self.bid_price;
        match (ask > Decimal::ZERO, bid > Decimal::ZERO) {
            (true, true) => Some((ask + bid) / Decimal::TWO),
            (true, false) => Some(ask),
            (false, true) => Some(bid),
            (false, false) => None,
        }
    }
}
