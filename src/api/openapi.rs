//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, health, profiles, users};
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libreteca API",
        version = "1.0.0",
        description = "Digital Library REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
        // Books
        books::list_books,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Borrows
        borrows::borrow_book,
        borrows::return_borrow,
        borrows::my_books,
        // Profile
        profiles::get_profile,
        profiles::update_profile,
        profiles::upload_avatar,
        // Users
        users::list_users,
        users::update_role,
        users::delete_user,
    ),
    components(schemas(
        models::Book,
        models::BookSummary,
        models::book::UpdateBookRequest,
        models::BorrowRecord,
        models::BorrowedBookDetails,
        models::Profile,
        models::ProfileSummary,
        models::profile::Role,
        models::profile::UpdateProfileRequest,
        models::profile::UpdateRoleRequest,
        models::auth::SignupRequest,
        models::auth::LoginRequest,
        models::auth::SessionResponse,
        auth::MeResponse,
        auth::SignOutResponse,
        borrows::BorrowResponse,
        borrows::ReturnResponse,
        health::HealthResponse,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "borrows", description = "Borrow and return workflow"),
        (name = "profile", description = "Profile self-service"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
