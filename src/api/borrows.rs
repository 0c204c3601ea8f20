//! Borrow and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrow::{BorrowRecord, BorrowedBookDetails},
};

use super::AuthenticatedUser;

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Borrow record ID
    pub id: i32,
    /// When the loan started (ISO 8601)
    pub borrowed_at: DateTime<Utc>,
    /// Status message
    pub message: String,
}

/// Return response with the closed record
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub status: String,
    pub record: BorrowRecord,
}

/// Borrow a book for the authenticated user
#[utoipa::path(
    post,
    path = "/api/books/{id}/borrow",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Already borrowed and not yet returned")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let record = state.services.borrows.borrow(claims.user_id, book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            id: record.id,
            borrowed_at: record.borrowed_at,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/api/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let record = state
        .services
        .borrows
        .return_borrow(claims.user_id, borrow_id)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        record,
    }))
}

/// The caller's borrow history with book details
#[utoipa::path(
    get,
    path = "/api/my-books",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed books", body = Vec<BorrowedBookDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowedBookDetails>>> {
    let records = state.services.borrows.borrowed_books(claims.user_id).await?;
    Ok(Json(records))
}
