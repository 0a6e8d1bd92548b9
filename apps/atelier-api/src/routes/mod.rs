//! # HTTP Routes
//!
//! ## Route Table
//! ```text
//! GET    /api/artisans                 list
//! POST   /api/artisans                 create        201
//! GET    /api/artisans/{id}            get           404 if absent
//! PUT    /api/artisans/{id}            replace       404 if absent
//! DELETE /api/artisans/{id}            delete        404 if absent
//! ...    /api/products[/{id}]          same as artisans
//! GET    /api/orders                   list, newest first
//! POST   /api/orders                   place order   201
//! GET    /api/orders/{id}              order + items + total
//! POST   /api/orders/{id}/cancel       cancel, restore stock
//! GET    /api/reports/low-stock        ?threshold=N
//! GET    /api/reports/sales-summary    ?start=..&end=..
//! GET    /health                       200 OK / 503
//! *                                    404 {"error": "Not found"}
//! ```

pub mod artisans;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::error::{ApiError, ErrorCode};
use crate::middleware::request_span;
use crate::AppState;

/// Body returned by delete and cancel endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health::health))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(request_span))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/artisans",
            get(artisans::list_artisans).post(artisans::create_artisan),
        )
        .route(
            "/artisans/{id}",
            get(artisans::get_artisan)
                .put(artisans::update_artisan)
                .delete(artisans::delete_artisan),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/cancel", post(orders::cancel_order))
        .route("/reports/low-stock", get(reports::low_stock))
        .route("/reports/sales-summary", get(reports::sales_summary))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::new(ErrorCode::NotFound, "Not found")
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::response::{IntoResponse, Response};
    use atelier_db::{Database, DbConfig};

    use crate::AppState;

    pub async fn state() -> AppState {
        AppState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    pub async fn json(response: impl IntoResponse) -> (axum::http::StatusCode, serde_json::Value) {
        let response: Response = response.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
