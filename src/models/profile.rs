//! Profile model, roles and self-service validation rules

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Application role carried by every profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversion: roles are stored as plain text
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Profile model from database.
///
/// The id is shared with the auth identity; the profile itself carries the
/// role and display data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row shape for the admin user listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: String,
    pub role: Role,
}

/// Update own profile request. Email and role are immutable through this
/// path; only the listed fields can change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Update role request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-zA-Z0-9_]+$").expect("username regex"));

/// Maximum accepted avatar size (2 MiB)
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Validate a username against the length and charset rules. Uniqueness is
/// checked separately against the profiles table.
pub fn validate_username(username: &str) -> AppResult<()> {
    if username.len() < 3 || username.len() > 20 {
        return Err(AppError::Validation(
            "Username must be between 3 and 20 characters".to_string(),
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(
            "Username may only contain letters, digits and underscores".to_string(),
        ));
    }
    Ok(())
}

/// Validate an avatar upload before any byte leaves the server
pub fn validate_avatar(content_type: &str, size: usize) -> AppResult<()> {
    if size > MAX_AVATAR_BYTES {
        return Err(AppError::Validation(
            "Avatar must be smaller than 2MB".to_string(),
        ));
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::Validation(
            "Avatar must be an image file".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("name with space").is_err());
        assert!(validate_username("name-with-dash").is_err());
        assert!(validate_username(&"a".repeat(21)).is_err());
        assert!(validate_username("valid_name1").is_ok());
        assert!(validate_username("abc").is_ok());
    }

    #[test]
    fn avatar_rules() {
        assert!(validate_avatar("image/png", 3 * 1024 * 1024).is_err());
        assert!(validate_avatar("text/plain", 1024).is_err());
        assert!(validate_avatar("image/png", 1024 * 1024).is_ok());
        assert!(validate_avatar("image/jpeg", MAX_AVATAR_BYTES).is_ok());
    }

    #[test]
    fn role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("librarian".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
