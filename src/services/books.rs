//! Book catalog management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::book::{slugify, Book, FilePart, NewBook, UpdateBookRequest},
    repository::Repository,
    services::storage::StorageService,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    storage: StorageService,
    books_bucket: String,
}

impl BooksService {
    pub fn new(repository: Repository, storage: StorageService, books_bucket: String) -> Self {
        Self {
            repository,
            storage,
            books_bucket,
        }
    }

    /// List the full catalog
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Detail page lookup by slug
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Book> {
        self.repository.books.get_by_slug(slug).await
    }

    /// Create a book: upload both assets, then insert the row.
    ///
    /// An upload failure aborts before any row is written; an object that
    /// already made it to storage from the other slot is not retracted.
    /// Slug collisions are not checked, matching the write path this
    /// replaces.
    pub async fn create_book(
        &self,
        title: String,
        author: Option<String>,
        description: Option<String>,
        cover: FilePart,
        pdf: FilePart,
    ) -> AppResult<Book> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        if cover.bytes.is_empty() || pdf.bytes.is_empty() {
            return Err(AppError::Validation(
                "Both a cover image and a PDF file are required".to_string(),
            ));
        }

        let cover_key = timestamped_key("covers", &cover.filename);
        let pdf_key = timestamped_key("pdfs", &pdf.filename);

        self.storage
            .upload(&self.books_bucket, &cover_key, cover.bytes, &cover.content_type)
            .await?;
        self.storage
            .upload(&self.books_bucket, &pdf_key, pdf.bytes, &pdf.content_type)
            .await?;

        let book = NewBook {
            slug: slugify(&title),
            cover_url: self.storage.public_url(&self.books_bucket, &cover_key),
            pdf_url: self.storage.public_url(&self.books_bucket, &pdf_key),
            title,
            author,
            description,
        };

        let created = self.repository.books.create(&book).await?;
        tracing::info!("book created: id={} slug={}", created.id, created.slug);
        Ok(created)
    }

    /// Direct field overwrite; the slug in the request is stored verbatim
    pub async fn update_book(&self, id: i32, update: UpdateBookRequest) -> AppResult<Book> {
        if update.title.trim().is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        self.repository.books.update(id, &update).await
    }

    /// Delete a book. Storage removals are best effort; the row deletion
    /// is authoritative and always attempted.
    pub async fn delete_book(&self, id: i32, confirm: bool) -> AppResult<()> {
        if !confirm {
            return Err(AppError::Validation(
                "Deletion requires explicit confirmation".to_string(),
            ));
        }

        let book = self.repository.books.get_by_id(id).await?;

        for url in [&book.cover_url, &book.pdf_url] {
            match StorageService::key_from_public_url(url) {
                Some((bucket, key)) => {
                    if let Err(e) = self.storage.remove(bucket, &[key.to_string()]).await {
                        tracing::warn!("failed to remove object for book {}: {}", id, e);
                    }
                }
                None => tracing::warn!("book {} has unrecognized asset url: {}", id, url),
            }
        }

        self.repository.books.delete(id).await?;
        tracing::info!("book deleted: id={}", id);
        Ok(())
    }
}

/// Collision-resistant object key: folder, millisecond timestamp, original
/// file name
fn timestamped_key(folder: &str, filename: &str) -> String {
    format!("{}/{}_{}", folder, Utc::now().timestamp_millis(), filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_carry_folder_and_filename() {
        let key = timestamped_key("covers", "rust.png");
        assert!(key.starts_with("covers/"));
        assert!(key.ends_with("_rust.png"));
    }
}
