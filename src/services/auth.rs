//! Authentication service: sign-up, login and JWT session issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        auth::{AuthUser, SessionClaims},
        profile::{validate_username, Profile, Role},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user: auth identity first, then the profile row with
    /// role `user`. The username availability check is a check-then-act
    /// sequence; a concurrent claim of the same name can slip through.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> AppResult<(String, AuthUser)> {
        validate_username(username)?;

        if self.repository.profiles.username_exists(username, None).await? {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        if self.repository.auth_users.email_exists(email).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = self.hash_password(password)?;
        let id = Uuid::new_v4();

        let user = self.repository.auth_users.create(id, email, &password_hash).await?;
        self.repository
            .profiles
            .create(id, email, username, Role::User)
            .await?;

        tracing::info!("new account registered: {}", username);

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Authenticate by email and password, returning a session token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, AuthUser)> {
        let user = self
            .repository
            .auth_users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Current auth identity with its profile, when one still exists
    pub async fn me(&self, user_id: Uuid) -> AppResult<(AuthUser, Option<Profile>)> {
        let user = self.repository.auth_users.get_by_id(user_id).await?;
        let profile = match self.repository.profiles.get_by_id(user_id).await {
            Ok(profile) => Some(profile),
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        Ok((user, profile))
    }

    fn create_token(&self, user: &AuthUser) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = SessionClaims {
            sub: user.email.clone(),
            user_id: user.id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &AuthUser, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
