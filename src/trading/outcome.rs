//! Result of evaluating one signal.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::OrderSize;

/// Business-rule reasons for refusing a signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Shorting is not supported for crypto asset {0}")]
    CryptoShort(String),

    #[error("{0} is not shortable")]
    NotShortable(String),

    #[error("Equity insufficient for one whole share: target ${target_value} at ${price}")]
    InsufficientForOneShare { target_value: Decimal, price: Decimal },

    #[error("Invalid price {0}")]
    InvalidPrice(Decimal),

    /// Unexpected collaborator failure, message only.
    #[error("{0}")]
    Broker(String),
}

impl Rejection {
    /// Whether this came from a failing collaborator rather than a rule.
    pub fn is_fault(&self) -> bool {
        matches!(self, Rejection::Broker(_))
    }
}

impl From<anyhow::Error> for Rejection {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain on one line
        Rejection::Broker(format!("{:#}", err))
    }
}

/// What the engine did with a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new entry order was accepted by the broker.
    Executed {
        symbol: String,
        order_id: String,
        size: OrderSize,
    },
    /// The open position was liquidated.
    Closed { symbol: String },
    /// Nothing to do.
    Ignored(String),
    /// Refused by a rule or failed at the broker.
    Rejected(Rejection),
}

impl Outcome {
    /// Short label used in responses and the journal.
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Executed { .. } | Outcome::Closed { .. } => "success",
            Outcome::Ignored(_) => "ignored",
            Outcome::Rejected(_) => "error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::Executed { symbol, size, .. } => match size {
                OrderSize::Notional(n) => format!("Bought ${} of {}", n, symbol),
                OrderSize::Quantity(q) => format!("Shorted {} shares of {}", q, symbol),
            },
            Outcome::Closed { symbol } => format!("Closed all {}", symbol),
            Outcome::Ignored(reason) => reason.clone(),
            Outcome::Rejected(rejection) => rejection.to_string(),
        }
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            Outcome::Executed { order_id, .. } => Some(order_id),
            _ => None,
        }
    }
}
