//! Inbound trading signal and the facts derived from its ticker.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TimeInForce;

/// What the alert asks us to do with a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalAction {
    /// Open a long position (`buy`)
    EnterLong,
    /// Open a short position (`sell_short`)
    EnterShort,
    /// Close a long position (`sell`)
    ExitLong,
    /// Cover a short position (`buy_to_cover`)
    ExitShort,
    /// Anything else. Never traded.
    Unrecognized,
}

impl SignalAction {
    /// Map the alert's `side` string to an action. Case-insensitive.
    pub fn from_side(side: &str) -> Self {
        match side.trim().to_lowercase().as_str() {
            "buy" => Self::EnterLong,
            "sell_short" => Self::EnterShort,
            "sell" => Self::ExitLong,
            "buy_to_cover" => Self::ExitShort,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnterLong => "enter_long",
            Self::EnterShort => "enter_short",
            Self::ExitLong => "exit_long",
            Self::ExitShort => "exit_short",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse asset classification from the ticker suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetClass {
    Crypto,
    Equity,
}

impl AssetClass {
    /// `BTCUSD`, `ETHUSDT` and friends are crypto; everything else is equity.
    pub fn classify(symbol: &str) -> Self {
        if symbol.ends_with("USD") || symbol.ends_with("USDT") {
            Self::Crypto
        } else {
            Self::Equity
        }
    }

    /// Crypto trades around the clock; equity orders expire with the session.
    pub fn time_in_force(&self) -> TimeInForce {
        match self {
            Self::Crypto => TimeInForce::Gtc,
            Self::Equity => TimeInForce::Day,
        }
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self, Self::Crypto)
    }
}

/// A normalized signal, ready for the decision engine.
///
/// The ticker is normalized and classified exactly once, here, so the
/// time-in-force and shorting checks of one evaluation always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Broker symbol: slashes stripped, uppercased
    pub symbol: String,

    /// Requested action
    pub action: SignalAction,

    /// Raw side string as received, kept for logs and the journal
    pub raw_side: String,

    /// Derived asset class
    pub asset_class: AssetClass,
}

impl Signal {
    /// Build a signal from the raw alert fields.
    pub fn new(ticker: &str, side: &str) -> Self {
        let symbol = normalize_ticker(ticker);
        let asset_class = AssetClass::classify(&symbol);

        Self {
            symbol,
            action: SignalAction::from_side(side),
            raw_side: side.to_string(),
            asset_class,
        }
    }

    pub fn time_in_force(&self) -> TimeInForce {
        self.asset_class.time_in_force()
    }
}

/// Strip `/` separators (e.g. `BTC/USD`) and uppercase.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().replace('/', "").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_mapping() {
        assert_eq!(SignalAction::from_side("buy"), SignalAction::EnterLong);
        assert_eq!(SignalAction::from_side("SELL"), SignalAction::ExitLong);
        assert_eq!(SignalAction::from_side("Sell_Short"), SignalAction::EnterShort);
        assert_eq!(SignalAction::from_side("buy_to_cover"), SignalAction::ExitShort);
        assert_eq!(SignalAction::from_side("hold"), SignalAction::Unrecognized);
        assert_eq!(SignalAction::from_side(""), SignalAction::Unrecognized);
    }

    #[test]
    fn test_ticker_normalization() {
        assert_eq!(normalize_ticker("btc/usd"), "BTCUSD");
        assert_eq!(normalize_ticker(" aapl "), "AAPL");
        assert_eq!(normalize_ticker("ETH/USDT"), "ETHUSDT");
        assert_eq!(normalize_ticker(" / "), "");
    }

    #[test]
    fn test_asset_classification() {
        let crypto = Signal::new("DOGE/USD", "buy");
        assert_eq!(crypto.symbol, "DOGEUSD");
        assert_eq!(crypto.asset_class, AssetClass::Crypto);
        assert_eq!(crypto.time_in_force(), TimeInForce::Gtc);

        let tether = Signal::new("ethusdt", "buy");
        assert_eq!(tether.asset_class, AssetClass::Crypto);

        let stock = Signal::new("gld", "sell_short");
        assert_eq!(stock.asset_class, AssetClass::Equity);
        assert_eq!(stock.time_in_force(), TimeInForce::Day);
        assert_eq!(stock.action, SignalAction::EnterShort);
    }
}
