//! Borrow records repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowRecord, BorrowedBookDetails, BorrowedBookRow},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrowed_books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", id)))
    }

    /// Check whether the user currently holds an open borrow of the book.
    /// An absent row is a normal answer, not an error.
    pub async fn open_exists(&self, user_id: Uuid, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrowed_books
                WHERE user_id = $1 AND book_id = $2 AND returned_at IS NULL
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new open borrow record
    pub async fn create(
        &self,
        user_id: Uuid,
        book_id: i32,
        borrowed_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrowed_books (user_id, book_id, borrowed_at, returned_at)
            VALUES ($1, $2, $3, NULL)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(borrowed_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Close a borrow record
    pub async fn mark_returned(
        &self,
        id: i32,
        returned_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            "UPDATE borrowed_books SET returned_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(returned_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", id)))?;

        Ok(record)
    }

    /// All borrow records of a user joined with their books, open and
    /// returned alike
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<BorrowedBookDetails>> {
        let rows = sqlx::query_as::<_, BorrowedBookRow>(
            r#"
            SELECT bb.id, bb.borrowed_at, bb.returned_at,
                   b.id as book_id, b.title, b.cover_url, b.description, b.slug
            FROM borrowed_books bb
            JOIN books b ON bb.book_id = b.id
            WHERE bb.user_id = $1
            ORDER BY bb.borrowed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
