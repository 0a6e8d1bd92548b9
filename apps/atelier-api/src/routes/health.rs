//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::{ApiError, ErrorCode};
use crate::AppState;

/// `GET /health` - `200 OK` while the database answers queries.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "OK").into_response()
    } else {
        tracing::warn!("Health check failed: database unreachable");
        ApiError::new(ErrorCode::Unavailable, "Database unavailable").into_response()
    }
}
