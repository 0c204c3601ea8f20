//! Object storage service over an S3-compatible backend.
//!
//! Exposes the narrow `upload / public_url / remove` surface the screens
//! consume. Public URLs keep the `/storage/v1/object/public/` shape so
//! delete paths can recover an object key by stripping the prefix.

use aws_sdk_s3::Client;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

const PUBLIC_PREFIX: &str = "/storage/v1/object/public/";

#[derive(Clone)]
pub struct StorageService {
    client: Client,
    public_base_url: String,
}

impl StorageService {
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let shared = aws_config::from_env()
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload an object and return its key
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        tracing::debug!("uploading {} bytes to {}/{}", bytes.len(), bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(bytes.into())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload to {}/{} failed: {}", bucket, key, e)))?;

        Ok(key.to_string())
    }

    /// Public URL under which an uploaded object is reachable
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}{}{}/{}", self.public_base_url, PUBLIC_PREFIX, bucket, key)
    }

    /// Recover (bucket, key) from a public URL by stripping the known
    /// prefix. Returns `None` for URLs this service did not mint.
    pub fn key_from_public_url(url: &str) -> Option<(&str, &str)> {
        let (_, rest) = url.split_once(PUBLIC_PREFIX)?;
        rest.split_once('/')
    }

    /// Remove objects. Callers decide whether a failure is fatal.
    pub async fn remove(&self, bucket: &str, keys: &[String]) -> AppResult<()> {
        for key in keys {
            self.client
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    AppError::Storage(format!("delete of {}/{} failed: {}", bucket, key, e))
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_public_url() {
        let url = format!(
            "https://cdn.example.org{}books/covers/1700000000000_rust.png",
            PUBLIC_PREFIX
        );
        assert_eq!(
            StorageService::key_from_public_url(&url),
            Some(("books", "covers/1700000000000_rust.png"))
        );
    }

    #[test]
    fn foreign_urls_yield_no_key() {
        assert_eq!(
            StorageService::key_from_public_url("https://example.org/other/path.png"),
            None
        );
    }
}
