//! Repository layer for database operations

pub mod auth_users;
pub mod books;
pub mod borrows;
pub mod profiles;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub auth_users: auth_users::AuthUsersRepository,
    pub profiles: profiles::ProfilesRepository,
    pub books: books::BooksRepository,
    pub borrows: borrows::BorrowsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            auth_users: auth_users::AuthUsersRepository::new(pool.clone()),
            profiles: profiles::ProfilesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            pool,
        }
    }
}
