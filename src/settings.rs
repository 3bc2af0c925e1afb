//! Process configuration from CLI flags, environment, and `.env`.

use std::sync::Arc;

use anyhow::{ensure, Result};
use clap::{ArgAction, Args};
use rust_decimal::Decimal;

use crate::api::{AlpacaClient, MarketDataClient};
use crate::trading::{DecisionEngine, RiskConfig};

/// Alpaca credentials and endpoints.
#[derive(Args, Debug, Clone)]
pub struct BrokerArgs {
    /// Alpaca API key ID
    #[arg(long, env = "ALPACA_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Alpaca API secret key
    #[arg(long, env = "ALPACA_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Trade on the paper account (set false for live trading)
    #[arg(long, env = "ALPACA_PAPER", default_value_t = true, action = ArgAction::Set)]
    pub paper: bool,

    /// Override the trading API base URL
    #[arg(long, env = "ALPACA_TRADING_URL")]
    pub trading_url: Option<String>,

    /// Override the market data API base URL
    #[arg(long, env = "ALPACA_DATA_URL")]
    pub data_url: Option<String>,
}

impl BrokerArgs {
    pub fn trading_client(&self) -> Result<AlpacaClient> {
        match &self.trading_url {
            Some(url) => AlpacaClient::with_base_url(&self.api_key, &self.secret_key, url.clone()),
            None => AlpacaClient::new(&self.api_key, &self.secret_key, self.paper),
        }
    }

    pub fn data_client(&self) -> Result<MarketDataClient> {
        match &self.data_url {
            Some(url) => MarketDataClient::with_base_url(&self.api_key, &self.secret_key, url.clone()),
            None => MarketDataClient::new(&self.api_key, &self.secret_key),
        }
    }

    /// Build the decision engine over live Alpaca clients.
    pub fn engine(&self, risk: RiskConfig) -> Result<DecisionEngine> {
        let broker = Arc::new(self.trading_client()?);
        let prices = Arc::new(self.data_client()?);
        Ok(DecisionEngine::new(risk, broker, prices))
    }
}

/// Entry sizing parameters.
#[derive(Args, Debug, Clone)]
pub struct RiskArgs {
    /// Fraction of account equity committed per entry
    #[arg(long, env = "RISK_FRACTION", default_value = "0.11")]
    pub risk_fraction: Decimal,

    /// Minimum entry size in USD
    #[arg(long, env = "MIN_NOTIONAL", default_value = "11.00")]
    pub min_notional: Decimal,

    /// Serialize signals per ticker (set false to allow concurrent evaluation)
    #[arg(long, env = "LOCK_PER_TICKER", default_value_t = true, action = ArgAction::Set)]
    pub lock_per_ticker: bool,
}

impl RiskArgs {
    /// Validate and convert to the engine's risk configuration.
    pub fn into_config(self) -> Result<RiskConfig> {
        ensure!(
            self.risk_fraction > Decimal::ZERO && self.risk_fraction <= Decimal::ONE,
            "RISK_FRACTION must be in (0, 1], got {}",
            self.risk_fraction
        );
        ensure!(
            self.min_notional >= Decimal::ONE,
            "MIN_NOTIONAL must be at least $1, got {}",
            self.min_notional
        );

        Ok(RiskConfig {
            risk_fraction: self.risk_fraction,
            min_notional: self.min_notional,
            lock_per_ticker: self.lock_per_ticker,
        })
    }
}

/// Mask a secret for display, keeping the last four characters.
pub fn mask(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 4 {
        return "****".to_string();
    }
    format!("****{}", secret.chars().skip(len - 4).collect::<String>())
}
