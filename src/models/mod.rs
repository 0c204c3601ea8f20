//! Data models for Libreteca

pub mod auth;
pub mod book;
pub mod borrow;
pub mod profile;

// Re-export commonly used types
pub use auth::{AuthUser, SessionClaims};
pub use book::{Book, BookSummary};
pub use borrow::{BorrowRecord, BorrowedBookDetails};
pub use profile::{Profile, ProfileSummary, Role};
