//! Order intent produced by the decision engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

/// Order lifetime policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Expires at the end of the trading session
    Day,
    /// Good-til-cancelled
    Gtc,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
        }
    }
}

/// How an order is sized. Exactly one of notional or quantity, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSize {
    /// Dollar amount; the broker fills a fractional quantity
    Notional(Decimal),
    /// Whole shares
    Quantity(Decimal),
}

impl OrderSize {
    pub fn notional(&self) -> Option<Decimal> {
        match self {
            OrderSize::Notional(n) => Some(*n),
            OrderSize::Quantity(_) => None,
        }
    }

    pub fn quantity(&self) -> Option<Decimal> {
        match self {
            OrderSize::Quantity(q) => Some(*q),
            OrderSize::Notional(_) => None,
        }
    }
}

/// A market order the engine wants the broker to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: OrderSide,
    pub time_in_force: TimeInForce,
    pub size: OrderSize,
}

impl OrderIntent {
    /// Dollar-sized buy for a long entry.
    pub fn notional_buy(symbol: &str, notional: Decimal, time_in_force: TimeInForce) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: OrderSide::Buy,
            time_in_force,
            size: OrderSize::Notional(notional),
        }
    }

    /// Whole-share sell for a short entry.
    pub fn quantity_sell(symbol: &str, qty: Decimal, time_in_force: TimeInForce) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: OrderSide::Sell,
            time_in_force,
            size: OrderSize::Quantity(qty),
        }
    }
}

/// Broker acknowledgement of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub id: String,
}
