//! Borrow record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::book::BookSummary;

/// Borrow record from database. A record with `returned_at = NULL` denotes
/// a book currently checked out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: Uuid,
    pub book_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

/// Internal row structure for the joined borrow listing
#[derive(Debug, Clone, FromRow)]
pub struct BorrowedBookRow {
    pub id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub book_id: i32,
    pub title: String,
    pub cover_url: String,
    pub description: Option<String>,
    pub slug: String,
}

impl From<BorrowedBookRow> for BorrowedBookDetails {
    fn from(row: BorrowedBookRow) -> Self {
        BorrowedBookDetails {
            id: row.id,
            borrowed_at: row.borrowed_at,
            returned_at: row.returned_at,
            book: BookSummary {
                id: row.book_id,
                title: row.title,
                cover_url: row.cover_url,
                description: row.description,
                slug: row.slug,
            },
        }
    }
}

/// Borrow record with its book, for the "my books" screen
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowedBookDetails {
    pub id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub book: BookSummary,
}
