//! Product handlers.
//!
//! Input is validated before any storage access: a missing name or negative
//! stock never reaches the database. An `artisan_id` naming no artisan is
//! caught by the foreign key and reported as "Invalid reference".

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use atelier_core::validation::validate_product;
use atelier_core::{Product, ProductInput, ProductListing};

use super::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::AppState;

/// `GET /api/products` - every product with its artisan's name.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductListing>>> {
    Ok(Json(state.db.products().list().await?))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Product>> {
    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<ProductInput>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let draft = validate_product(input)?;
    let product = state.db.products().create(&draft).await?;

    tracing::info!(product_id = product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` - full replace, stock included.
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<ProductInput>,
) -> ApiResult<Json<Product>> {
    let repo = state.db.products();
    if repo.get_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Product", id));
    }

    let draft = validate_product(input)?;
    Ok(Json(repo.update(id, &draft).await?))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.products().delete(id).await?;

    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(MessageResponse {
        message: "Deleted",
        success: Some(true),
    }))
}
