use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{BookCount, Overview, SearchParams, UserView};
use crate::{
    auth::extractors::AdminUser,
    catalog::BookSummary,
    dto::MessageResponse,
    error::{AppError, AppResult},
    state::AppState,
    usage::services::{summarize, UsageReport},
};

pub const BOOK_SEARCH_LIMIT: u32 = 100;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/overview", get(overview))
        .route("/admin/users", get(list_users))
        .route("/admin/users/search", get(search_users))
        .route("/admin/users/:id", delete(delete_user))
        .route("/admin/books/count", get(count_books))
        .route("/admin/books/search", get(search_books))
        .route("/admin/books/:book_id", delete(delete_book))
        .route("/admin/token-usage", get(token_usage))
}

fn required_query(params: &SearchParams) -> Result<&str, AppError> {
    let query = params.query.trim();
    if query.is_empty() {
        warn!("blank admin search");
        return Err(AppError::BadRequest("query is required".into()));
    }
    Ok(query)
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn overview(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<Overview>> {
    let total_users = state.accounts.count_users().await?;
    let total_favorites = state.favorites.count().await?;
    let total_books = state.catalog.count().await?;
    Ok(Json(Overview {
        total_users,
        total_favorites,
        total_books,
    }))
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<Vec<UserView>>> {
    let users = state.accounts.list_users().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn search_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<UserView>>> {
    let query = required_query(&params)?;
    let users = state.accounts.search_users(query).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !state.accounts.delete_user(id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted")))
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn count_books(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<BookCount>> {
    let total_books = state.catalog.count().await?;
    Ok(Json(BookCount { total_books }))
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn search_books(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<BookSummary>>> {
    let query = required_query(&params)?;
    let books = state
        .catalog
        .find_matching(query, BOOK_SEARCH_LIMIT)
        .await?;
    Ok(Json(books))
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn delete_book(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(book_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.catalog.delete(&book_id).await?;
    info!(book_id = %book_id, "book deleted from catalog");
    Ok(Json(MessageResponse::new(format!(
        "Book {book_id} deleted from catalog"
    ))))
}

#[instrument(skip(state, admin), fields(admin_id = admin.id))]
pub async fn token_usage(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<UsageReport>> {
    let rows = state.usage.list().await?;
    Ok(Json(summarize(rows)))
}
