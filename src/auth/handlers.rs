use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginInfo, LoginRequest, RegisterRequest, RegisterResponse, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        repo_types::AccountKind,
        services::{authenticate, register_user},
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/admin/login", post(admin_login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/logininfo", get(login_info))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let user = register_user(state.accounts.as_ref(), payload).await?;
    Ok(Json(RegisterResponse {
        message: "User created successfully".into(),
        user_id: user.id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = authenticate(
        state.accounts.as_ref(),
        AccountKind::User,
        &payload.identifier,
        &payload.password,
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign_user(&user.username)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let admin = authenticate(
        state.accounts.as_ref(),
        AccountKind::Admin,
        &payload.identifier,
        &payload.password,
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign_admin(&admin.username)?;
    info!(admin_id = admin.id, username = %admin.username, "admin logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip_all)]
pub async fn login_info(AuthUser(user): AuthUser) -> Json<LoginInfo> {
    Json(LoginInfo {
        username: user.username,
        email: user.email,
    })
}
