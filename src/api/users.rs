//! User management endpoints (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::profile::{Profile, ProfileSummary, UpdateRoleRequest},
};

use super::{require_admin, AuthenticatedUser};

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All profiles", body = Vec<ProfileSummary>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ProfileSummary>>> {
    require_admin(&state, claims.user_id).await?;

    let users = state.services.profiles.list_users().await?;
    Ok(Json(users))
}

/// Overwrite a user's role
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = Profile),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_role(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> AppResult<Json<Profile>> {
    require_admin(&state, claims.user_id).await?;

    let profile = state.services.profiles.set_role(user_id, request.role).await?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct DeleteUserParams {
    pub confirm: Option<bool>,
}

/// Delete a user's profile row. Requires `?confirm=true`. The auth
/// identity and the user's borrow records are not cascaded.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("confirm" = Option<bool>, Query, description = "Must be true; no silent deletes")
    ),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 400, description = "Confirmation missing"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Query(params): Query<DeleteUserParams>,
) -> AppResult<StatusCode> {
    require_admin(&state, claims.user_id).await?;

    state
        .services
        .profiles
        .delete_user(user_id, params.confirm.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
