//! Webhook Signal Trader
//!
//! Receives charting alerts over HTTP and turns each one into a risk-sized
//! Alpaca order: open a position, close it, or refuse the signal.

mod api;
mod db;
mod models;
mod server;
mod settings;
mod trading;

use std::sync::Arc;

use anyhow::{anyhow, ensure, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::db::Database;
use crate::models::Signal;
use crate::server::AppState;
use crate::settings::{mask, BrokerArgs, RiskArgs};

/// Webhook signal trader CLI.
#[derive(Parser)]
#[command(name = "signal-trader")]
#[command(about = "Turn charting alerts into Alpaca orders", long_about = None)]
struct Cli {
    /// Signal journal database URL (journal disabled when unset)
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
        bind: String,

        /// Shared secret every alert must carry
        #[arg(long, env = "WEBHOOK_PASSPHRASE", hide_env_values = true)]
        passphrase: String,

        /// Ticker used when an alert omits one
        #[arg(long, env = "DEFAULT_TICKER", default_value = "DOGEUSD")]
        default_ticker: String,

        #[command(flatten)]
        broker: BrokerArgs,

        #[command(flatten)]
        risk: RiskArgs,
    },

    /// Evaluate a single signal against the broker
    Signal {
        /// Ticker, e.g. AAPL or BTC/USD
        #[arg(short, long)]
        ticker: String,

        /// buy, sell, sell_short, or buy_to_cover
        #[arg(short, long)]
        side: String,

        #[command(flatten)]
        broker: BrokerArgs,

        #[command(flatten)]
        risk: RiskArgs,
    },

    /// Show current configuration
    Config {
        #[command(flatten)]
        broker: BrokerArgs,

        #[command(flatten)]
        risk: RiskArgs,
    },

    /// Show recently journaled signals
    History {
        /// Number of signals to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: i64,
    },

    /// Show signal counts by outcome
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let journal = match &cli.database {
        Some(url) => Some(Arc::new(Database::new(url).await?)),
        None => None,
    };

    match cli.command {
        Commands::Serve {
            bind,
            passphrase,
            default_ticker,
            broker,
            risk,
        } => {
            ensure!(!passphrase.is_empty(), "WEBHOOK_PASSPHRASE must not be empty");

            let risk = risk.into_config()?;
            info!(
                paper = broker.paper,
                risk_fraction = %risk.risk_fraction,
                min_notional = %risk.min_notional,
                lock_per_ticker = risk.lock_per_ticker,
                journal = journal.is_some(),
                "Starting webhook server"
            );

            let engine = broker.engine(risk)?;
            let state = Arc::new(AppState {
                engine: Arc::new(engine),
                passphrase,
                default_ticker,
                journal,
            });

            server::serve(state, &bind).await?;
        }

        Commands::Signal {
            ticker,
            side,
            broker,
            risk,
        } => {
            let engine = broker.engine(risk.into_config()?)?;
            let signal = Signal::new(&ticker, &side);

            println!(
                "\nSignal: {} {} ({:?}, {})",
                signal.symbol,
                signal.action,
                signal.asset_class,
                signal.time_in_force().as_str()
            );

            let outcome = engine.evaluate(&signal).await;

            if let Some(db) = &journal {
                db.record_signal(&signal, &outcome).await?;
            }

            println!("Status:   {}", outcome.status());
            println!("Message:  {}", outcome.message());
            if let Some(id) = outcome.order_id() {
                println!("Order ID: {}", id);
            }
        }

        Commands::Config { broker, risk } => {
            let risk = risk.into_config()?;
            let trading = broker.trading_client()?;

            println!("\n=== Broker ===\n");
            println!("  Mode:                 {}", if broker.paper { "PAPER" } else { "LIVE" });
            println!("  Trading API:          {}", trading.base_url());
            println!("  API Key:              {}", mask(&broker.api_key));
            println!("  Secret Key:           {}", mask(&broker.secret_key));

            println!("\n=== Risk ===\n");
            println!("  Risk Fraction:        {}%", risk.risk_fraction * Decimal::ONE_HUNDRED);
            println!("  Min Notional:         ${}", risk.min_notional);
            println!("  Lock Per Ticker:      {}", risk.lock_per_ticker);

            println!("\n=== Journal ===\n");
            println!(
                "  Database:             {}",
                cli.database.as_deref().unwrap_or("disabled")
            );
        }

        Commands::History { limit } => {
            let db = journal.ok_or_else(|| anyhow!("--database (or DATABASE_URL) is required"))?;
            let signals = db.get_recent_signals(limit).await?;

            if signals.is_empty() {
                println!("No signals journaled yet.");
                return Ok(());
            }

            println!(
                "\n{:>6} {:<26} {:<10} {:<13} {:<8} {:<38} MESSAGE",
                "ID", "RECEIVED", "TICKER", "SIDE", "STATUS", "ORDER"
            );
            println!("{}", "-".repeat(120));

            for s in signals {
                println!(
                    "{:>6} {:<26} {:<10} {:<13} {:<8} {:<38} {}",
                    s.id,
                    truncate(&s.received_at, 25),
                    truncate(&s.ticker, 10),
                    truncate(&s.side, 13),
                    s.status,
                    s.order_id.as_deref().unwrap_or("-"),
                    s.message.as_deref().unwrap_or("")
                );
            }
        }

        Commands::Stats => {
            let db = journal.ok_or_else(|| anyhow!("--database (or DATABASE_URL) is required"))?;
            let stats = db.get_signal_stats().await?;
            let total: i64 = stats.iter().map(|(_, n)| n).sum();

            println!("\n=== Signals ===");
            for (status, count) in &stats {
                println!("{:<10} {:>8}", status, count);
            }
            println!("{:<10} {:>8}", "total", total);
        }
    }

    Ok(())
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
