//! Libreteca Server - Digital Library
//!
//! REST API server for a small digital-library web application.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libreteca_server::{
    api,
    config::AppConfig,
    guard,
    repository::Repository,
    services::{storage::StorageService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "libreteca_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libreteca Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Initialize object storage client
    let storage = StorageService::new(&config.storage)
        .await
        .expect("Failed to create object storage client");

    tracing::info!("Object storage client ready");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        config.auth.clone(),
        &config.storage,
        storage,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/signup", post(api::auth::signup))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id/update", put(api::books::update_book))
        .route("/books/:id/delete", delete(api::books::delete_book))
        // Borrows
        .route("/books/:id/borrow", post(api::borrows::borrow_book))
        .route("/borrows/:id/return", post(api::borrows::return_borrow))
        .route("/my-books", get(api::borrows::my_books))
        // Profile self-service
        .route("/profile", get(api::profiles::get_profile))
        .route("/profile", put(api::profiles::update_profile))
        .route("/profile/avatar", post(api::profiles::upload_avatar))
        // User management
        .route("/users", get(api::users::list_users))
        .route("/users/:id/role", put(api::users::update_role))
        .route("/users/:id", delete(api::users::delete_user))
        .with_state(state.clone());

    // Page routes, guarded by the route-access policy
    let page_routes = Router::new()
        .route("/", get(api::pages::home))
        .route("/books", get(api::pages::books_index))
        .route("/books/:slug", get(api::pages::book_detail))
        .route("/login", get(api::pages::login_page))
        .route("/signup", get(api::pages::signup_page))
        .route("/contact", get(api::pages::contact_page))
        .route("/profile", get(api::pages::profile_page))
        .route("/my-book", get(api::pages::my_book_page))
        .route("/admin", get(api::pages::admin_page))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
