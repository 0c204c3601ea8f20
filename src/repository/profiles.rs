//! Profiles repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::profile::{Profile, ProfileSummary, Role, UpdateProfileRequest},
};

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: Pool<Postgres>,
}

impl ProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a profile at sign-up, sharing the auth identity's id
    pub async fn create(
        &self,
        id: Uuid,
        email: &str,
        username: &str,
        role: Role,
    ) -> AppResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, username, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(username)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Get profile by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    /// Look up a profile's role. Returns `None` when the row is missing so
    /// the caller can treat the role as absent rather than failing.
    pub async fn role_of(&self, id: Uuid) -> AppResult<Option<Role>> {
        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    /// Check if username is already taken by someone else
    pub async fn username_exists(&self, username: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM profiles WHERE LOWER(username) = LOWER($1) AND id != $2)",
            )
            .bind(username)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM profiles WHERE LOWER(username) = LOWER($1))",
            )
            .bind(username)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// List all profiles for the admin screen
    pub async fn list(&self) -> AppResult<Vec<ProfileSummary>> {
        let profiles = sqlx::query_as::<_, ProfileSummary>(
            "SELECT id, email, username, role FROM profiles ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Update the owner-editable fields. Email and role are never touched
    /// here.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &UpdateProfileRequest,
    ) -> AppResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET username = COALESCE($2, username),
                full_name = COALESCE($3, full_name),
                bio = COALESCE($4, bio),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.username)
        .bind(&update.full_name)
        .bind(&update.bio)
        .bind(&update.avatar_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

        Ok(profile)
    }

    /// Point the profile at a freshly uploaded avatar
    pub async fn update_avatar_url(&self, id: Uuid, avatar_url: &str) -> AppResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET avatar_url = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(avatar_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

        Ok(profile)
    }

    /// Overwrite the role (admin operation, no audit trail)
    pub async fn update_role(&self, id: Uuid, role: Role) -> AppResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET role = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

        Ok(profile)
    }

    /// Delete the profile row only. Borrow records and the auth identity
    /// are intentionally left in place.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Profile {} not found", id)));
        }
        Ok(())
    }
}
