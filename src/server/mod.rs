//! Webhook HTTP server.

mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::Database;
use crate::trading::DecisionEngine;

pub use error::ApiError;

/// Shared state for all handlers.
pub struct AppState {
    pub engine: Arc<DecisionEngine>,
    pub passphrase: String,
    pub default_ticker: String,
    pub journal: Option<Arc<Database>>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(handlers::webhook))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C.
///
/// # Errors
/// Returns an error if the server fails to bind to the address or serve requests.
pub async fn serve(state: Arc<AppState>, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Webhook server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down webhook server");
        })
        .await?;

    Ok(())
}
