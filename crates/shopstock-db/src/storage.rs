//! HTTP client for the object storage API holding product images.
//!
//! Wraps `reqwest` with the storage service's auth header, upload and
//! download endpoints, and public URL construction. Re-uploading an object
//! that already exists is treated as success so repeated imports stay
//! idempotent.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Characters escaped inside a storage key path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("storage upload of '{key}' failed with status {status}: {body}")]
    UploadFailed {
        key: String,
        status: StatusCode,
        body: String,
    },
    #[error("download of '{url}' failed with status {status}")]
    DownloadFailed { url: String, status: StatusCode },
}

/// Client for the product image object store.
///
/// Use [`StorageClient::new`] with the configured base URL, or point it at a
/// mock server in tests.
pub struct StorageClient {
    client: Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl StorageClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        bucket: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Uploads object bytes under `key` and returns the public URL.
    ///
    /// A `409 Conflict` ("already exists") response counts as success: the
    /// object is present and its public URL is valid either way.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Http`] on network failure.
    /// - [`StorageError::UploadFailed`] on any other non-2xx status.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            encode_key(key)
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(self.public_url(key));
        }
        if status == StatusCode::CONFLICT {
            tracing::debug!(key, "object already exists, treating upload as success");
            return Ok(self.public_url(key));
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::UploadFailed {
            key: key.to_string(),
            status,
            body,
        })
    }

    /// Fetches image bytes from an arbitrary remote URL.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Http`] on network failure.
    /// - [`StorageError::DownloadFailed`] on a non-2xx status.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::DownloadFailed {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Public (unauthenticated) URL for an object key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            encode_key(key)
        )
    }
}

/// Percent-encodes each segment of a storage key, preserving the slashes.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// MIME type for an image filename, from its extension.
///
/// Unknown extensions fall back to `application/octet-stream`; the walker
/// only admits the known image extensions so this is a remote-URL edge.
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_covers_known_extensions() {
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.webp"), "image/webp");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }

    #[test]
    fn encode_key_preserves_slashes_and_escapes_spaces() {
        assert_eq!(
            encode_key("product/IPH16-PRO/iph16 pro-1.jpg"),
            "product/IPH16-PRO/iph16%20pro-1.jpg"
        );
    }
}
