//! Alpaca API clients and the collaborator traits the decision engine calls.

mod alpaca_client;
mod data_client;
mod types;

#[cfg(test)]
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{OrderAck, OrderIntent, PositionLookup};

pub use alpaca_client::AlpacaClient;
pub use data_client::MarketDataClient;

/// Account, asset, and order operations of a brokerage.
///
/// A missing position is a normal answer (`PositionLookup::Absent`), not an error.
/// Every `Err` is an unexpected collaborator failure.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Look up the open position for `symbol`.
    async fn get_open_position(&self, symbol: &str) -> Result<PositionLookup>;

    /// Current total account equity in USD.
    async fn get_account_equity(&self) -> Result<Decimal>;

    /// Whether the broker allows shorting `symbol`.
    async fn is_shortable(&self, symbol: &str) -> Result<bool>;

    /// Place a market order.
    async fn submit_order(&self, intent: &OrderIntent) -> Result<OrderAck>;

    /// Liquidate the whole position in `symbol`, whichever side it is.
    async fn close_position(&self, symbol: &str) -> Result<()>;
}

/// Last traded (or quoted) price source.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn latest_price(&self, symbol: &str) -> Result<Decimal>;
}
