//! Order handlers.
//!
//! Placement and cancellation go through the order engine
//! (`atelier_db::OrderRepository`), which runs each one as a single
//! `BEGIN IMMEDIATE` transaction. Every engine rejection is a 400.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use atelier_core::validation::validate_order_lines;
use atelier_core::{Order, OrderDetails, OrderLine};

use super::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::AppState;

/// Body of `POST /api/orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Missing `items` is treated like an empty list.
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// `GET /api/orders` - newest first.
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db.orders().list_orders().await?))
}

/// `GET /api/orders/{id}` - order with line items and total.
pub async fn get_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<OrderDetails>> {
    state
        .db
        .orders()
        .get_order(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order", id))
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderDetails>)> {
    validate_order_lines(&request.items)?;

    let details = state.db.orders().create_order(&request.items).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// `POST /api/orders/{id}/cancel`
pub async fn cancel_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.orders().cancel_order(id).await?;

    Ok(Json(MessageResponse {
        message: "Order cancelled and stock restored",
        success: None,
    }))
}
