//! Position sizing: equity-fraction target with a notional floor.

use rust_decimal::Decimal;

use super::{Rejection, RiskConfig};

/// Calculator for entry order sizes.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    config: RiskConfig,
}

impl PositionSizer {
    /// Create a new position sizer with given config.
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Dollar value to commit to a new entry.
    ///
    /// `max(equity * risk_fraction, min_notional)`. Strictly increasing in
    /// equity until the floor binds, flat at the floor below that.
    pub fn target_value(&self, equity: Decimal) -> Decimal {
        (equity * self.config.risk_fraction).max(self.config.min_notional)
    }

    /// Notional for a long entry: the target value rounded to cents.
    pub fn long_notional(&self, target_value: Decimal) -> Decimal {
        target_value.round_dp(2)
    }

    /// Whole-share quantity for a short entry.
    ///
    /// Short sales cannot be fractional, so the target value is floored to
    /// whole shares at `price`.
    pub fn short_quantity(&self, target_value: Decimal, price: Decimal) -> Result<Decimal, Rejection> {
        if price <= Decimal::ZERO {
            return Err(Rejection::InvalidPrice(price));
        }

        let qty = (target_value / price).floor();

        if qty < Decimal::ONE {
            return Err(Rejection::InsufficientForOneShare {
                target_value,
                price,
            });
        }

        Ok(qty)
    }
}
