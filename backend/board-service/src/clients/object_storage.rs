/// Object storage for image attachments
///
/// Two backends share one contract:
/// - `HttpObjectStorage`: plain bucket/key PUT API (triple-s style)
/// - `S3ObjectStorage`: S3 or any S3-compatible store via `s3-utils`
use crate::error::{AppError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use reqwest::{Client as HttpClient, StatusCode};
use s3_utils::S3Operations;
use std::time::Duration;

/// Random bytes per object key
const OBJECT_KEY_BYTES: usize = 22;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create `bucket` if missing. Existing buckets are not an error.
    async fn ensure_bucket(&self, bucket: &str) -> Result<()>;

    /// Store `bytes` under a fresh key and return a retrieval reference.
    async fn put(&self, bucket: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;
}

/// URL-safe random object key
pub fn generate_object_key() -> String {
    let mut raw = [0u8; OBJECT_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut raw);
    URL_SAFE_NO_PAD.encode(raw)
}

pub struct HttpObjectStorage {
    /// Where the service writes, e.g. `http://triple-s:1414`
    endpoint: String,
    /// Where clients read, e.g. `http://localhost:1414`
    public_url: String,
    http_client: HttpClient,
}

impl HttpObjectStorage {
    pub fn new(
        endpoint: impl Into<String>,
        public_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::RemoteUnavailable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn write_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key)
    }

    fn public_object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        let response = self
            .http_client
            .put(format!("{}/{}", self.endpoint, bucket))
            .send()
            .await
            .map_err(|e| AppError::RemoteUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::CONFLICT => {
                tracing::info!(bucket, "Bucket ready");
                Ok(())
            }
            status => Err(AppError::RemoteUnavailable(format!(
                "bucket creation for '{}' failed with status {}",
                bucket, status
            ))),
        }
    }

    async fn put(&self, bucket: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let key = generate_object_key();
        let size = bytes.len();

        let response = self
            .http_client
            .put(self.write_url(bucket, &key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::RemoteUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteUnavailable(format!(
                "upload failed (status {}): {}",
                status, body
            )));
        }

        tracing::info!(bucket, key = %key, size, "Stored image");
        Ok(self.public_object_url(bucket, &key))
    }
}

pub struct S3ObjectStorage {
    operations: S3Operations,
}

impl S3ObjectStorage {
    pub fn new(operations: S3Operations) -> Self {
        Self { operations }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        self.operations
            .ensure_bucket(bucket)
            .await
            .map_err(|e| AppError::RemoteUnavailable(e.to_string()))
    }

    async fn put(&self, bucket: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let key = generate_object_key();
        let size = bytes.len();

        let url = self
            .operations
            .upload_object(bucket, &key, bytes, content_type)
            .await
            .map_err(|e| AppError::RemoteUnavailable(e.to_string()))?;

        tracing::info!(bucket, key = %key, size, "Stored image in S3");
        Ok(url)
    }
}
