//! Page routes: JSON screen data for each navigation target.
//!
//! These are the routes the route guard runs ahead of; each handler only
//! gathers the data its screen renders.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{Book, BorrowedBookDetails, ProfileSummary},
};

use super::{AuthenticatedUser, OptionalSession};

#[derive(Serialize)]
pub struct PageInfo {
    pub page: &'static str,
}

#[derive(Serialize)]
pub struct HomePage {
    pub page: &'static str,
    pub books: Vec<Book>,
}

/// `/` — library overview
pub async fn home(State(state): State<crate::AppState>) -> AppResult<Json<HomePage>> {
    let books = state.services.books.list().await?;
    Ok(Json(HomePage {
        page: "home",
        books,
    }))
}

/// `/books` — full catalog
pub async fn books_index(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// `/books/{slug}` — detail page
pub async fn book_detail(
    State(state): State<crate::AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_slug(&slug).await?;
    Ok(Json(book))
}

/// `/login`
pub async fn login_page() -> Json<PageInfo> {
    Json(PageInfo { page: "login" })
}

/// `/signup`
pub async fn signup_page() -> Json<PageInfo> {
    Json(PageInfo { page: "signup" })
}

/// `/contact`
pub async fn contact_page() -> Json<PageInfo> {
    Json(PageInfo { page: "contact" })
}

/// `/profile` — the screen itself bounces anonymous visitors to the login
/// page; the guard does not cover this path
pub async fn profile_page(
    State(state): State<crate::AppState>,
    OptionalSession(claims): OptionalSession,
) -> Response {
    let Some(claims) = claims else {
        return Redirect::to("/login").into_response();
    };

    match state.services.profiles.get(claims.user_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `/my-book` — the caller's borrowed books; the guard guarantees a session
pub async fn my_book_page(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowedBookDetails>>> {
    let records = state.services.borrows.borrowed_books(claims.user_id).await?;
    Ok(Json(records))
}

#[derive(Serialize)]
pub struct AdminPage {
    pub page: &'static str,
    pub books: Vec<Book>,
    pub users: Vec<ProfileSummary>,
}

/// `/admin` — management dashboard. The guard already performed the one
/// role lookup for this navigation and only lets admins through, so the
/// handler does not look the role up again.
pub async fn admin_page(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<AdminPage>> {
    let books = state.services.books.list().await?;
    let users = state.services.profiles.list_users().await?;
    Ok(Json(AdminPage {
        page: "admin",
        books,
        users,
    }))
}
