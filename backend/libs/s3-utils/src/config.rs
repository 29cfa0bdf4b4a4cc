/// S3 configuration shared across services
use crate::operations::S3Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region
    pub region: String,
    /// Custom endpoint (S3-compatible stores); `None` means AWS
    pub endpoint: Option<String>,
    /// Base URL objects are publicly served from
    pub public_base_url: String,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Result<Self, S3Error> {
        let path_style = match std::env::var("S3_PATH_STYLE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| S3Error::Config(format!("S3_PATH_STYLE='{}' is not a bool", raw)))?,
            Err(_) => true,
        };

        Ok(Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("STORAGE_ENDPOINT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            public_base_url: std::env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| "https://s3.amazonaws.com".to_string()),
            path_style,
        })
    }

    /// Public URL for an object in a bucket
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        let base = self.public_base_url.trim_end_matches('/');
        if self.path_style {
            format!("{}/{}/{}", base, bucket, key)
        } else {
            format!("https://{}.s3.{}.amazonaws.com/{}", bucket, self.region, key)
        }
    }
}
