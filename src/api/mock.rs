//! Recording collaborators for tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{OrderAck, OrderIntent, Position, PositionLookup};

use super::{Broker, PriceFeed};

/// Records every call so tests can assert on broker traffic.
///
/// Submitting an order opens a position; closing removes it.
#[derive(Default)]
pub struct MockBroker {
    pub open: Mutex<HashSet<String>>,
    pub equity: Decimal,
    pub not_shortable: HashSet<String>,
    pub fail_position: bool,
    pub fail_equity: bool,
    pub fail_submit: bool,
    pub fail_close: bool,
    pub submit_delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<OrderIntent>>,
}

impl MockBroker {
    pub fn with_equity(equity: Decimal) -> Self {
        Self {
            equity,
            ..Default::default()
        }
    }

    pub fn holding(self, symbol: &str) -> Self {
        self.open.lock().unwrap().insert(symbol.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl Broker for MockBroker {
    async fn get_open_position(&self, symbol: &str) -> Result<PositionLookup> {
        self.record("get_open_position");
        if self.fail_position {
            return Err(anyhow!("positions endpoint timed out"));
        }
        let open = self.open.lock().unwrap().contains(symbol);
        Ok(if open {
            PositionLookup::Open(Position {
                symbol: symbol.to_string(),
                qty: dec!(1),
                side: "long".to_string(),
            })
        } else {
            PositionLookup::Absent
        })
    }

    async fn get_account_equity(&self) -> Result<Decimal> {
        self.record("get_account_equity");
        if self.fail_equity {
            return Err(anyhow!("account endpoint unavailable"));
        }
        Ok(self.equity)
    }

    async fn is_shortable(&self, symbol: &str) -> Result<bool> {
        self.record("is_shortable");
        Ok(!self.not_shortable.contains(symbol))
    }

    async fn submit_order(&self, intent: &OrderIntent) -> Result<OrderAck> {
        self.record("submit_order");
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_submit {
            return Err(anyhow!("insufficient buying power"));
        }
        self.submitted.lock().unwrap().push(intent.clone());
        self.open.lock().unwrap().insert(intent.symbol.clone());
        Ok(OrderAck {
            id: format!("order-{}", intent.symbol),
        })
    }

    async fn close_position(&self, symbol: &str) -> Result<()> {
        self.record("close_position");
        if self.fail_close {
            return Err(anyhow!("position close rejected"));
        }
        self.open.lock().unwrap().remove(symbol);
        Ok(())
    }
}

/// Fixed-price feed that counts lookups.
pub struct MockPrices {
    price: Option<Decimal>,
    calls: Mutex<usize>,
}

impl MockPrices {
    pub fn at(price: Decimal) -> Self {
        Self {
            price: Some(price),
            calls: Mutex::new(0),
        }
    }

    /// A feed with no data for any symbol.
    pub fn unavailable() -> Self {
        Self {
            price: None,
            calls: Mutex::new(0),
        }
    }

    pub fn count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PriceFeed for MockPrices {
    async fn latest_price(&self, symbol: &str) -> Result<Decimal> {
        *self.calls.lock().unwrap() += 1;
        self.price.ok_or_else(|| anyhow!("No price available for {}", symbol))
    }
}
