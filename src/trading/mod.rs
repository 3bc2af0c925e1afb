//! Trading logic: position sizing, per-ticker locking, decision engine.

mod config;
mod engine;
mod outcome;
mod position_sizer;
mod ticker_locks;

pub use config::RiskConfig;
pub use engine::DecisionEngine;
pub use outcome::{Outcome, Rejection};
pub use position_sizer::PositionSizer;
pub use ticker_locks::TickerLocks;
