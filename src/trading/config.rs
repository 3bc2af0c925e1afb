//! Risk configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for entry sizing and signal handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Fraction of account equity committed per new entry (0.0 to 1.0)
    pub risk_fraction: Decimal,

    /// Minimum dollar size of any entry; the broker rejects smaller notionals
    pub min_notional: Decimal,

    /// Serialize evaluations of the same ticker so two concurrent entries
    /// cannot both see "no position"
    pub lock_per_ticker: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_fraction: dec!(0.11), // 11% of equity
            min_notional: dec!(11.00), // Alpaca minimum is $1
            lock_per_ticker: true,
        }
    }
}
