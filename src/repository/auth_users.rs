//! Auth identities repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::auth::AuthUser,
};

#[derive(Clone)]
pub struct AuthUsersRepository {
    pool: Pool<Postgres>,
}

impl AuthUsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new auth identity
    pub async fn create(&self, id: Uuid, email: &str, password_hash: &str) -> AppResult<AuthUser> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            INSERT INTO auth_users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get auth identity by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<AuthUser> {
        sqlx::query_as::<_, AuthUser>("SELECT * FROM auth_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Auth user {} not found", id)))
    }

    /// Get auth identity by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT * FROM auth_users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM auth_users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
