//! API handlers for the Libreteca REST endpoints

pub mod auth;
pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;
pub mod pages;
pub mod profiles;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    error::AppError, guard::session_token, models::profile::Role, models::SessionClaims, AppState,
};

/// Extractor for the authenticated user's session claims. The token is
/// accepted from the Authorization header or the `session` cookie.
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| AppError::Authentication("Missing session token".to_string()))?;

        let claims = SessionClaims::from_token(&token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor for pages that render differently with and without a session.
/// An invalid token is treated as no session.
pub struct OptionalSession(pub Option<SessionClaims>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = session_token(&parts.headers)
            .and_then(|token| SessionClaims::from_token(&token, &state.config.auth.jwt_secret).ok());
        Ok(OptionalSession(claims))
    }
}

/// Admin gate for API endpoints: a fresh role lookup per request, never
/// taken from the token
pub async fn require_admin(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    match state.services.profiles.role_of(user_id).await? {
        Some(Role::Admin) => Ok(()),
        _ => Err(AppError::Authorization(
            "Administrator privileges required".to_string(),
        )),
    }
}
