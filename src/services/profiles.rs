//! Profile self-service and admin user management

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::FilePart,
        profile::{
            validate_avatar, validate_username, Profile, ProfileSummary, Role,
            UpdateProfileRequest,
        },
    },
    repository::Repository,
    services::storage::StorageService,
};

#[derive(Clone)]
pub struct ProfilesService {
    repository: Repository,
    storage: StorageService,
    avatars_bucket: String,
}

impl ProfilesService {
    pub fn new(repository: Repository, storage: StorageService, avatars_bucket: String) -> Self {
        Self {
            repository,
            storage,
            avatars_bucket,
        }
    }

    /// Get profile by ID
    pub async fn get(&self, user_id: Uuid) -> AppResult<Profile> {
        self.repository.profiles.get_by_id(user_id).await
    }

    /// Fresh role lookup by session identity. A missing row means the role
    /// is absent, not an error.
    pub async fn role_of(&self, user_id: Uuid) -> AppResult<Option<Role>> {
        self.repository.profiles.role_of(user_id).await
    }

    /// Update the caller's own profile. A username change is validated and
    /// checked for uniqueness before the write; other fields go through
    /// unchecked. Email and role cannot be changed here.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: UpdateProfileRequest,
    ) -> AppResult<Profile> {
        let current = self.repository.profiles.get_by_id(user_id).await?;

        if let Some(ref username) = update.username {
            if *username != current.username {
                validate_username(username)?;
                if self
                    .repository
                    .profiles
                    .username_exists(username, Some(user_id))
                    .await?
                {
                    return Err(AppError::Conflict("Username is already taken".to_string()));
                }
            }
        }

        self.repository.profiles.update_profile(user_id, &update).await
    }

    /// Upload a new avatar. The file is validated before any upload; the
    /// previous avatar object is removed best effort first, and the profile
    /// row only changes after the new object is confirmed stored.
    pub async fn upload_avatar(&self, user_id: Uuid, file: FilePart) -> AppResult<Profile> {
        validate_avatar(&file.content_type, file.bytes.len())?;

        let profile = self.repository.profiles.get_by_id(user_id).await?;

        if let Some(ref old_url) = profile.avatar_url {
            match StorageService::key_from_public_url(old_url) {
                Some((bucket, key)) => {
                    if let Err(e) = self.storage.remove(bucket, &[key.to_string()]).await {
                        tracing::warn!("failed to remove previous avatar of {}: {}", user_id, e);
                    }
                }
                None => tracing::warn!("unrecognized previous avatar url: {}", old_url),
            }
        }

        let ext = file
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("bin");
        let key = format!("avatar_{}_{}.{}", user_id, Utc::now().timestamp_millis(), ext);

        self.storage
            .upload(&self.avatars_bucket, &key, file.bytes, &file.content_type)
            .await?;

        let url = self.storage.public_url(&self.avatars_bucket, &key);
        self.repository.profiles.update_avatar_url(user_id, &url).await
    }

    /// Admin: list every profile
    pub async fn list_users(&self) -> AppResult<Vec<ProfileSummary>> {
        self.repository.profiles.list().await
    }

    /// Admin: overwrite a user's role
    pub async fn set_role(&self, user_id: Uuid, role: Role) -> AppResult<Profile> {
        self.repository.profiles.update_role(user_id, role).await
    }

    /// Admin: delete a profile row. Requires the confirmation flag; the
    /// auth identity and the user's borrow records are left untouched.
    pub async fn delete_user(&self, user_id: Uuid, confirm: bool) -> AppResult<()> {
        if !confirm {
            return Err(AppError::Validation(
                "Deletion requires explicit confirmation".to_string(),
            ));
        }
        self.repository.profiles.delete(user_id).await?;
        tracing::info!("profile deleted: {}", user_id);
        Ok(())
    }
}
