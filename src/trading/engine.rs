//! Decision engine: turns one signal into at most one broker action.
//!
//! For every signal the engine:
//! - looks up the open position for the ticker at the broker
//! - closes it on exit signals, or refuses a second entry
//! - sizes new entries from account equity (notional for longs, whole shares for shorts)
//! - submits the order and reports what happened
//!
//! The engine holds no position state of its own; the broker is the source of truth.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::{Broker, PriceFeed};
use crate::models::{OrderIntent, PositionLookup, Signal, SignalAction};

use super::{Outcome, PositionSizer, Rejection, RiskConfig, TickerLocks};

/// Signal-to-order decision engine.
pub struct DecisionEngine {
    broker: Arc<dyn Broker>,
    prices: Arc<dyn PriceFeed>,
    sizer: PositionSizer,
    locks: Option<TickerLocks>,
}

impl DecisionEngine {
    /// Create a new engine over the given collaborators.
    pub fn new(config: RiskConfig, broker: Arc<dyn Broker>, prices: Arc<dyn PriceFeed>) -> Self {
        let locks = config.lock_per_ticker.then(TickerLocks::new);
        let sizer = PositionSizer::new(config);

        Self {
            broker,
            prices,
            sizer,
            locks,
        }
    }

    /// Evaluate a signal. Never fails: collaborator errors become `Outcome::Rejected`.
    pub async fn evaluate(&self, signal: &Signal) -> Outcome {
        let exit = match signal.action {
            SignalAction::ExitLong | SignalAction::ExitShort => true,
            SignalAction::EnterLong | SignalAction::EnterShort => false,
            SignalAction::Unrecognized => {
                info!(symbol = %signal.symbol, side = %signal.raw_side, "Ignoring unrecognized side");
                return Outcome::Ignored(format!("Unrecognized side '{}'", signal.raw_side));
            }
        };

        if signal.symbol.is_empty() {
            info!(side = %signal.raw_side, "Ignoring signal without a ticker");
            return Outcome::Ignored("Missing ticker".to_string());
        }

        // Held from the position lookup until the order is submitted
        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(&signal.symbol).await),
            None => None,
        };

        let outcome = match self.decide(signal, exit).await {
            Ok(outcome) => outcome,
            Err(rejection) => Outcome::Rejected(rejection),
        };

        match &outcome {
            Outcome::Rejected(r) if r.is_fault() => {
                error!(symbol = %signal.symbol, action = %signal.action, error = %r, "Broker call failed")
            }
            Outcome::Rejected(r) => {
                warn!(symbol = %signal.symbol, action = %signal.action, reason = %r, "Signal rejected")
            }
            Outcome::Ignored(reason) => {
                info!(symbol = %signal.symbol, action = %signal.action, reason = %reason, "Signal ignored")
            }
            Outcome::Executed { order_id, .. } => {
                info!(symbol = %signal.symbol, action = %signal.action, order_id = %order_id, "Entry submitted")
            }
            Outcome::Closed { .. } => {
                info!(symbol = %signal.symbol, action = %signal.action, "Position closed")
            }
        }

        outcome
    }

    async fn decide(&self, signal: &Signal, exit: bool) -> Result<Outcome, Rejection> {
        let position = self.broker.get_open_position(&signal.symbol).await?;

        if exit {
            self.exit(signal, &position).await
        } else {
            self.enter(signal, &position).await
        }
    }

    /// Close whatever is open, long or short.
    async fn exit(&self, signal: &Signal, position: &PositionLookup) -> Result<Outcome, Rejection> {
        let PositionLookup::Open(open) = position else {
            return Ok(Outcome::Ignored(format!(
                "No open position for {}",
                signal.symbol
            )));
        };

        info!(symbol = %signal.symbol, qty = %open.qty, side = %open.side, "Closing entire position");
        self.broker.close_position(&signal.symbol).await?;

        Ok(Outcome::Closed {
            symbol: signal.symbol.clone(),
        })
    }

    async fn enter(&self, signal: &Signal, position: &PositionLookup) -> Result<Outcome, Rejection> {
        if position.is_open() {
            return Ok(Outcome::Ignored("Position already open".to_string()));
        }

        let short = signal.action == SignalAction::EnterShort;

        if short && signal.asset_class.is_crypto() {
            return Err(Rejection::CryptoShort(signal.symbol.clone()));
        }

        let equity = self.broker.get_account_equity().await?;
        let target_value = self.sizer.target_value(equity);
        let tif = signal.time_in_force();

        let intent = if short {
            if !self.broker.is_shortable(&signal.symbol).await? {
                return Err(Rejection::NotShortable(signal.symbol.clone()));
            }

            let price = self.prices.latest_price(&signal.symbol).await?;
            let qty = self.sizer.short_quantity(target_value, price)?;

            info!(
                equity = %equity,
                target = %target_value,
                price = %price,
                qty = %qty,
                tif = tif.as_str(),
                "Sizing short entry"
            );

            OrderIntent::quantity_sell(&signal.symbol, qty, tif)
        } else {
            let notional = self.sizer.long_notional(target_value);

            info!(
                equity = %equity,
                notional = %notional,
                tif = tif.as_str(),
                "Sizing long entry"
            );

            OrderIntent::notional_buy(&signal.symbol, notional, tif)
        };

        let ack = self.broker.submit_order(&intent).await?;

        Ok(Outcome::Executed {
            symbol: signal.symbol.clone(),
            order_id: ack.id,
            size: intent.size,
        })
    }
}
