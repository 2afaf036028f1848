//! HTTP handlers for tripay-service.

pub mod transactions;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::error::AppError;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "tripay-service" })),
    )
}

/// Answer plain OPTIONS requests without contacting the gateway.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Fallback for methods a route does not accept.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
