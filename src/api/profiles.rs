//! Profile self-service endpoints

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::book::FilePart,
    models::profile::{Profile, UpdateProfileRequest},
};

use super::AuthenticatedUser;

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = Profile),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Profile no longer exists")
    )
)]
pub async fn get_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = state.services.profiles.get(claims.user_id).await?;
    Ok(Json(profile))
}

/// Update the caller's profile. Email and role cannot be changed here.
#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Invalid username"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(update): Json<UpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .services
        .profiles
        .update_profile(claims.user_id, update)
        .await?;
    Ok(Json(profile))
}

/// Upload a new avatar (multipart field `avatar`, max 2MB, images only)
#[utoipa::path(
    post,
    path = "/api/profile/avatar",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Avatar updated", body = Profile),
        (status = 400, description = "File too large or not an image"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn upload_avatar(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<Profile>> {
    let mut file: Option<FilePart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form: {}", e)))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let filename = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?
            .to_vec();
        file = Some(FilePart {
            filename,
            content_type,
            bytes,
        });
    }

    let file =
        file.ok_or_else(|| AppError::Validation("An avatar file is required".to_string()))?;

    let profile = state
        .services
        .profiles
        .upload_avatar(claims.user_id, file)
        .await?;
    Ok(Json(profile))
}
