//! Signal journal: an audit trail of every authenticated webhook signal.
//!
//! Stores, per signal:
//! - the normalized ticker, raw side, and mapped action
//! - the outcome status and message
//! - the broker order id when an entry was placed
//!
//! The journal is never consulted for trading decisions.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::models::Signal;
use crate::trading::Outcome;

/// Database connection pool.
pub struct Database {
    pool: SqlitePool,
}

/// Stored signal record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredSignal {
    pub id: i64,
    pub ticker: String,
    pub side: String,
    pub action: String,
    pub status: String,
    pub message: Option<String>,
    pub order_id: Option<String>,
    pub received_at: String,
}

impl Database {
    /// Create a new database connection.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS signals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                side TEXT NOT NULL,
                action TEXT NOT NULL,
                status TEXT NOT NULL,
                message TEXT,
                order_id TEXT,
                received_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_signals_ticker ON signals(ticker)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a signal and what the engine did with it.
    pub async fn record_signal(&self, signal: &Signal, outcome: &Outcome) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO signals (ticker, side, action, status, message, order_id, received_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&signal.symbol)
        .bind(&signal.raw_side)
        .bind(signal.action.as_str())
        .bind(outcome.status())
        .bind(outcome.message())
        .bind(outcome.order_id())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent signals first.
    pub async fn get_recent_signals(&self, limit: i64) -> Result<Vec<StoredSignal>> {
        let rows = sqlx::query_as::<_, StoredSignal>(
            "SELECT * FROM signals ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Signal counts grouped by outcome status.
    pub async fn get_signal_stats(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM signals GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
