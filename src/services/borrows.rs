//! Borrow and return workflow

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowRecord, BorrowedBookDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for the authenticated user.
    ///
    /// Check-then-act: the open-record lookup and the insert are separate
    /// statements, so two concurrent calls can both pass the check. This
    /// window is inherent to the design; closing it would take a partial
    /// unique index on (user_id, book_id) WHERE returned_at IS NULL.
    pub async fn borrow(&self, user_id: Uuid, book_id: i32) -> AppResult<BorrowRecord> {
        // 404 on unknown books rather than inserting a dangling reference
        self.repository.books.get_by_id(book_id).await?;

        if self.repository.borrows.open_exists(user_id, book_id).await? {
            return Err(AppError::Conflict(
                "You have already borrowed this book and not yet returned it".to_string(),
            ));
        }

        let record = self
            .repository
            .borrows
            .create(user_id, book_id, Utc::now())
            .await?;

        tracing::info!("book {} borrowed by {}", book_id, user_id);
        Ok(record)
    }

    /// Return a borrowed book
    pub async fn return_borrow(&self, user_id: Uuid, borrow_id: i32) -> AppResult<BorrowRecord> {
        let record = self.repository.borrows.get_by_id(borrow_id).await?;

        if record.user_id != user_id {
            return Err(AppError::Authorization(
                "This borrow record belongs to another user".to_string(),
            ));
        }
        if record.returned_at.is_some() {
            return Err(AppError::Conflict(
                "This book has already been returned".to_string(),
            ));
        }

        let returned = self
            .repository
            .borrows
            .mark_returned(borrow_id, Utc::now())
            .await?;

        tracing::info!("borrow {} returned by {}", borrow_id, user_id);
        Ok(returned)
    }

    /// All of a user's borrow records with their books
    pub async fn borrowed_books(&self, user_id: Uuid) -> AppResult<Vec<BorrowedBookDetails>> {
        self.repository.borrows.list_for_user(user_id).await
    }
}
