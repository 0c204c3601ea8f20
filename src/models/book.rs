//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_url: String,
    pub pdf_url: String,
    /// URL-safe identifier derived from the title, used in the detail-page route
    pub slug: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Short book representation embedded in borrow listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub cover_url: String,
    pub description: Option<String>,
    pub slug: String,
}

/// New book row, assembled after both file uploads succeeded
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_url: String,
    pub pdf_url: String,
    pub slug: String,
}

/// Book update request (legacy update endpoint wire format).
///
/// The slug is taken verbatim from the caller; an edited title does NOT
/// re-derive it, so a stale slug after a title change is expected behavior.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub slug: String,
}

/// A file received through a multipart form
#[derive(Debug, Clone)]
pub struct FilePart {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Derive a URL-safe slug from a book title: lowercase, spaces become
/// hyphens, anything outside `[A-Za-z0-9_-]` is dropped.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("The Rust Book"), "the-rust-book");
    }

    #[test]
    fn slugify_strips_non_word_characters() {
        assert_eq!(slugify("C++ & Friends!"), "c--friends");
        assert_eq!(slugify("100% Проверка"), "100-");
    }

    #[test]
    fn slugify_keeps_underscores_and_digits() {
        assert_eq!(slugify("snake_case 42"), "snake_case-42");
    }

    #[test]
    fn slugify_output_charset_is_word_or_hyphen() {
        for title in ["Hello, World!", "  spaced  out  ", "ämläut ok"] {
            let slug = slugify(title);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                "unexpected character in slug {:?}",
                slug
            );
            assert_eq!(slug, slug.to_lowercase());
        }
    }
}
