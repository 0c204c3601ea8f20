//! Book catalog endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, FilePart, UpdateBookRequest},
};

use super::{require_admin, AuthenticatedUser};

/// List all books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "Book catalog", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Create a new book from a multipart form (admin)
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing title or files"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Book>)> {
    require_admin(&state, claims.user_id).await?;

    let form = BookForm::parse(multipart).await?;
    let cover = form
        .cover
        .ok_or_else(|| AppError::Validation("A cover image is required".to_string()))?;
    let pdf = form
        .pdf
        .ok_or_else(|| AppError::Validation("A PDF file is required".to_string()))?;

    let book = state
        .services
        .books
        .create_book(form.title, form.author, form.description, cover, pdf)
        .await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book (admin).
///
/// Legacy wire contract: replies `{"success": true}`, or `{"error": msg}`
/// with status 400 on any failure.
#[utoipa::path(
    put,
    path = "/api/books/{id}/update",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated"),
        (status = 400, description = "Update failed")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateBookRequest>,
) -> Response {
    let result = async {
        require_admin(&state, claims.user_id).await?;
        state.services.books.update_book(id, body).await
    }
    .await;

    match result {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub confirm: Option<bool>,
}

/// Delete a book and, best effort, its storage objects (admin).
///
/// Requires `?confirm=true`; same legacy wire contract as the update
/// endpoint. The row deletion succeeds even when the object removals fail.
#[utoipa::path(
    delete,
    path = "/api/books/{id}/delete",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("confirm" = Option<bool>, Query, description = "Must be true; no silent deletes")
    ),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 400, description = "Deletion failed or not confirmed")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let result = async {
        require_admin(&state, claims.user_id).await?;
        state
            .services
            .books
            .delete_book(id, params.confirm.unwrap_or(false))
            .await
    }
    .await;

    match result {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Fields collected from the book creation form
struct BookForm {
    title: String,
    author: Option<String>,
    description: Option<String>,
    cover: Option<FilePart>,
    pdf: Option<FilePart>,
}

impl BookForm {
    async fn parse(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = BookForm {
            title: String::new(),
            author: None,
            description: None,
            cover: None,
            pdf: None,
        };

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart form: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => {
                    form.title = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?;
                }
                "author" => {
                    form.author = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| AppError::Validation(e.to_string()))?,
                    );
                }
                "description" => {
                    form.description = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| AppError::Validation(e.to_string()))?,
                    );
                }
                "cover" | "pdf" => {
                    let filename = field.file_name().unwrap_or("file").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?
                        .to_vec();
                    let part = FilePart {
                        filename,
                        content_type,
                        bytes,
                    };
                    if name == "cover" {
                        form.cover = Some(part);
                    } else {
                        form.pdf = Some(part);
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}
