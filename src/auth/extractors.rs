use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::{error, warn};

use super::{
    claims::Claims,
    jwt::JwtKeys,
    repo_types::{Account, AccountKind},
};
use crate::{error::AppError, state::AppState};

/// A verified, non-admin caller resolved against the `users` table.
pub struct AuthUser(pub Account);

/// A verified admin caller resolved against the `admins` table.
pub struct AdminUser(pub Account);

fn bearer_claims(parts: &Parts, state: &AppState) -> Result<Claims, AppError> {
    // Read Authorization header
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    // Expect "Bearer <token>"
    let token = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

    JwtKeys::from_ref(state).verify(token.trim()).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::Unauthorized("Could not validate credentials".into())
    })
}

async fn resolve(
    state: &AppState,
    kind: AccountKind,
    username: &str,
) -> Result<Account, AppError> {
    match state.accounts.find_by_username(kind, username).await {
        Ok(Some(account)) => Ok(account),
        Ok(None) => {
            warn!(username = %username, ?kind, "token subject not found");
            Err(AppError::Unauthorized(match kind {
                AccountKind::User => "User not found".into(),
                AccountKind::Admin => "Admin not found".into(),
            }))
        }
        Err(e) => {
            error!(error = %e, "account lookup failed");
            Err(AppError::Internal(e))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if claims.is_admin() {
            warn!(username = %claims.sub, "admin token used on user endpoint");
            return Err(AppError::Unauthorized("User token required".into()));
        }
        resolve(state, AccountKind::User, &claims.sub)
            .await
            .map(AuthUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if !claims.is_admin() {
            warn!(username = %claims.sub, "non-admin token on admin endpoint");
            return Err(AppError::Unauthorized("Admin token invalid".into()));
        }
        resolve(state, AccountKind::Admin, &claims.sub)
            .await
            .map(AdminUser)
    }
}
