//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::auth::{LoginRequest, SessionResponse, SignupRequest},
    models::Profile,
};

use super::AuthenticatedUser;

const SESSION_COOKIE: &str = "session";

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid email, password or username"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Json(request): Json<SignupRequest>,
) -> AppResult<(CookieJar, (StatusCode, Json<SessionResponse>))> {
    request.validate()?;

    let (token, user) = state
        .services
        .auth
        .signup(&request.email, &request.password, &request.username)
        .await?;

    let jar = jar.add(session_cookie(&token));
    Ok((
        jar,
        (
            StatusCode::CREATED,
            Json(SessionResponse {
                token,
                token_type: "Bearer".to_string(),
                user_id: user.id,
                email: user.email,
            }),
        ),
    ))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    request.validate()?;

    let (token, user) = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;

    let jar = jar.add(session_cookie(&token));
    Ok((
        jar,
        Json(SessionResponse {
            token,
            token_type: "Bearer".to_string(),
            user_id: user.id,
            email: user.email,
        }),
    ))
}

#[derive(Serialize, ToSchema)]
pub struct SignOutResponse {
    pub status: String,
}

/// Sign out: clears the session cookie. Issued tokens are not revoked
/// server-side.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Signed out", body = SignOutResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<SignOutResponse>) {
    // The removal cookie must carry the same path as the one set at login,
    // or browsers keep the original
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (
        jar,
        Json(SignOutResponse {
            status: "signed_out".to_string(),
        }),
    )
}

#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub id: uuid::Uuid,
    pub email: String,
    /// Absent when the profile row has been deleted by an admin
    pub profile: Option<Profile>,
}

/// Current auth identity and profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MeResponse>> {
    let (user, profile) = state.services.auth.me(claims.user_id).await?;
    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        profile,
    }))
}
