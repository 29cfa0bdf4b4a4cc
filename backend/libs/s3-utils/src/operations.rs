/// S3 operations used for attachment storage
use crate::config::S3Config;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum S3Error {
    #[error("S3 configuration error: {0}")]
    Config(String),
    #[error("S3 request failed: {0}")]
    Request(String),
}

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Operations {
    pub fn new(client: Arc<Client>, config: S3Config) -> Self {
        Self { client, config }
    }

    /// Create a bucket; an existing bucket is not an error
    pub async fn ensure_bucket(&self, bucket: &str) -> Result<(), S3Error> {
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => {
                tracing::info!(bucket, "Created S3 bucket");
                Ok(())
            }
            Err(err) => {
                let exists = err
                    .as_service_error()
                    .map(|e| e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists())
                    .unwrap_or(false);
                if exists {
                    tracing::debug!(bucket, "S3 bucket already exists");
                    Ok(())
                } else {
                    Err(S3Error::Request(err.to_string()))
                }
            }
        }
    }

    /// Upload an object and return its public URL
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, S3Error> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| S3Error::Request(e.to_string()))?;

        Ok(self.config.object_url(bucket, key))
    }
}
