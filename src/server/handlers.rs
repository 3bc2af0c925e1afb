use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::models::Signal;
use crate::trading::Outcome;

use super::{ApiError, AppState};

/// Alert payload posted by the charting tool.
///
/// Read field by field from untyped JSON, so a wrongly typed field can
/// never answer before the passphrase check does.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WebhookRequest {
    pub passphrase: Option<String>,
    pub ticker: Option<String>,
    pub side: Option<String>,
}

impl WebhookRequest {
    pub fn from_json(body: &Value) -> Self {
        let ticker = match body.get("ticker") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            // Not a usable symbol; normalizes to empty and is ignored
            Some(_) => Some(String::new()),
        };

        let side = match body.get("side") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Self {
            passphrase: body
                .get("passphrase")
                .and_then(Value::as_str)
                .map(str::to_string),
            ticker,
            side,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
}

impl WebhookResponse {
    pub fn error(message: String) -> Self {
        Self {
            status: "error",
            message: Some(message),
            order_id: None,
            notional: None,
            qty: None,
        }
    }
}

impl From<&Outcome> for WebhookResponse {
    fn from(outcome: &Outcome) -> Self {
        let (notional, qty) = match outcome {
            Outcome::Executed { size, .. } => (size.notional(), size.quantity()),
            _ => (None, None),
        };

        Self {
            status: outcome.status(),
            message: Some(outcome.message()),
            order_id: outcome.order_id().map(str::to_string),
            notional,
            qty,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Receives an alert and runs it through the decision engine.
///
/// The body is parsed as JSON whatever the content type; charting tools
/// often post JSON as `text/plain`.
///
/// # Errors
/// Returns `ApiError::BadRequest` when the body is not JSON at all and
/// `ApiError::Unauthorized` on a passphrase mismatch.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let request = WebhookRequest::from_json(&body);

    if request.passphrase.as_deref() != Some(state.passphrase.as_str()) {
        warn!("Rejected webhook with invalid passphrase");
        return Err(ApiError::Unauthorized);
    }

    let ticker = request.ticker.as_deref().unwrap_or(&state.default_ticker);
    let side = request.side.as_deref().unwrap_or_default();
    let signal = Signal::new(ticker, side);

    info!(
        symbol = %signal.symbol,
        side = %signal.raw_side,
        action = %signal.action,
        asset_class = ?signal.asset_class,
        "Signal received"
    );

    let outcome = state.engine.evaluate(&signal).await;

    if let Some(journal) = &state.journal {
        if let Err(e) = journal.record_signal(&signal, &outcome).await {
            warn!(error = %e, symbol = %signal.symbol, "Failed to journal signal");
        }
    }

    Ok(Json(WebhookResponse::from(&outcome)))
}

/// Liveness probe. Answers GET and HEAD.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
