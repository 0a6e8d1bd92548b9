//! Artisan handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use atelier_core::validation::validate_artisan;
use atelier_core::{Artisan, ArtisanInput};

use super::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::AppState;

/// `GET /api/artisans`
pub async fn list_artisans(State(state): State<AppState>) -> ApiResult<Json<Vec<Artisan>>> {
    Ok(Json(state.db.artisans().list().await?))
}

/// `GET /api/artisans/{id}`
pub async fn get_artisan(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Artisan>> {
    state
        .db
        .artisans()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Artisan", id))
}

/// `POST /api/artisans`
pub async fn create_artisan(
    State(state): State<AppState>,
    AppJson(input): AppJson<ArtisanInput>,
) -> ApiResult<(StatusCode, Json<Artisan>)> {
    let draft = validate_artisan(input)?;
    let artisan = state.db.artisans().create(&draft).await?;

    tracing::info!(artisan_id = artisan.id, "Artisan created");
    Ok((StatusCode::CREATED, Json(artisan)))
}

/// `PUT /api/artisans/{id}` - full replace.
pub async fn update_artisan(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<ArtisanInput>,
) -> ApiResult<Json<Artisan>> {
    let repo = state.db.artisans();
    if repo.get_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Artisan", id));
    }

    let draft = validate_artisan(input)?;
    Ok(Json(repo.update(id, &draft).await?))
}

/// `DELETE /api/artisans/{id}`
pub async fn delete_artisan(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.artisans().delete(id).await?;

    tracing::info!(artisan_id = id, "Artisan deleted");
    Ok(Json(MessageResponse {
        message: "Deleted",
        success: Some(true),
    }))
}
