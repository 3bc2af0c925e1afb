//! Broker-side position as seen by the decision engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Open position held at the broker.
///
/// The engine only cares whether one exists; the rest is for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Broker symbol
    pub symbol: String,

    /// Signed or absolute quantity as reported by the broker
    pub qty: Decimal,

    /// "long" or "short"
    pub side: String,
}

/// Result of looking up a position by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionLookup {
    Open(Position),
    Absent,
}

impl PositionLookup {
    pub fn is_open(&self) -> bool {
        matches!(self, PositionLookup::Open(_))
    }
}

impl From<Option<Position>> for PositionLookup {
    fn from(position: Option<Position>) -> Self {
        match position {
            Some(p) => PositionLookup::Open(p),
            None => PositionLookup::Absent,
        }
    }
}
