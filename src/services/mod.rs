//! Business logic services

pub mod auth;
pub mod books;
pub mod borrows;
pub mod profiles;
pub mod storage;

use crate::{
    config::{AuthConfig, StorageConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub borrows: borrows::BorrowsService,
    pub profiles: profiles::ProfilesService,
}

impl Services {
    /// Create all services with the given repository and storage client
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        storage_config: &StorageConfig,
        storage: storage::StorageService,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            books: books::BooksService::new(
                repository.clone(),
                storage.clone(),
                storage_config.books_bucket.clone(),
            ),
            borrows: borrows::BorrowsService::new(repository.clone()),
            profiles: profiles::ProfilesService::new(
                repository,
                storage,
                storage_config.avatars_bucket.clone(),
            ),
        }
    }
}
