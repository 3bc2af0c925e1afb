//! Data models for signals, orders, and positions.

mod order;
mod position;
mod signal;

pub use order::{OrderAck, OrderIntent, OrderSide, OrderSize, TimeInForce};
pub use position::{Position, PositionLookup};
pub use signal::{Signal, SignalAction};
