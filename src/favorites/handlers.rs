use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AddFavoriteRequest, FavoritesResponse, IsFavoriteResponse},
    services::enrich_favorites,
};
use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/is_favorite/:book_id", get(is_favorite))
        .route("/favorites", post(add_favorite))
        .route("/favorites/:book_id", delete(remove_favorite))
        .route("/userfavorites", get(user_favorites))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn is_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(book_id): Path<String>,
) -> AppResult<Json<IsFavoriteResponse>> {
    let is_favorite = state.favorites.exists(user.id, book_id.trim()).await?;
    Ok(Json(IsFavoriteResponse { is_favorite }))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<AddFavoriteRequest>,
) -> AppResult<Json<MessageResponse>> {
    let book_id = payload.book_id.trim();
    if book_id.is_empty() {
        warn!("empty book_id");
        return Err(AppError::BadRequest("book_id is required".into()));
    }

    let inserted = state.favorites.add(user.id, book_id).await?;
    info!(book_id = %book_id, inserted, "favorite added");
    Ok(Json(MessageResponse::new("Book added to favorites")))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(book_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let book_id = book_id.trim();
    if !state.favorites.remove(user.id, book_id).await? {
        return Err(AppError::NotFound("Not in favorites".into()));
    }
    info!(book_id = %book_id, "favorite removed");
    Ok(Json(MessageResponse::new("Removed from favorites")))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn user_favorites(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<FavoritesResponse>> {
    let favorites =
        enrich_favorites(state.favorites.as_ref(), state.catalog.as_ref(), user.id).await?;
    Ok(Json(FavoritesResponse { favorites }))
}
