use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::handlers::WebhookResponse;

/// Transport-level failures. Everything past the gate answers 200 with a status field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid passphrase")]
    Unauthorized,

    #[error("Invalid JSON body: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(WebhookResponse::error(self.to_string()));
        (self.status_code(), body).into_response()
    }
}
