/// Avatar catalog client
///
/// The catalog is a finite, 1-based list of characters served over HTTP as
/// `GET {base_url}/character/{n}` returning `{"name": ..., "image": ...}`.
use crate::error::{AppError, Result};
use crate::models::CatalogEntry;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarCatalog: Send + Sync {
    /// Look up entry `sequence` (1-based, already reduced into range).
    async fn lookup(&self, sequence: u32) -> Result<CatalogEntry>;
}

pub struct HttpAvatarCatalog {
    base_url: String,
    http_client: HttpClient,
}

impl HttpAvatarCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::AvatarUnavailable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn character_url(&self, sequence: u32) -> String {
        format!("{}/character/{}", self.base_url, sequence)
    }
}

#[async_trait]
impl AvatarCatalog for HttpAvatarCatalog {
    async fn lookup(&self, sequence: u32) -> Result<CatalogEntry> {
        let url = self.character_url(sequence);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::AvatarUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::AvatarUnavailable(format!(
                "catalog returned {} for entry {}",
                response.status(),
                sequence
            )));
        }

        let entry = response
            .json::<CatalogEntry>()
            .await
            .map_err(|e| AppError::AvatarUnavailable(format!("malformed catalog entry: {e}")))?;

        tracing::debug!(sequence, name = %entry.name, "Fetched catalog entry");
        Ok(entry)
    }
}
