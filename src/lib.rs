//! Libreteca Digital Library Server
//!
//! A Rust REST server for a small digital library: users browse books,
//! borrow and return them and manage a profile; administrators manage
//! book records and user roles.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
