/// Configuration management for Board Service
///
/// All settings come from environment variables (a `.env` file is honoured
/// by the binary before loading).
use crate::services::attachments::{IMAGE_MAX_BYTES, REQUEST_MAX_BYTES};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Attachment storage configuration
    pub storage: StorageConfig,
    /// Avatar catalog configuration
    pub catalog: CatalogConfig,
    /// Archival sweep configuration
    pub archive: ArchiveConfig,
    /// Size and time bounds
    pub limits: LimitsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Database configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Bucket/key PUT API
    Http,
    /// S3 or S3-compatible
    S3,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "triple-s" => Ok(StorageBackend::Http),
            "s3" => Ok(StorageBackend::S3),
            other => Err(format!("Unknown STORAGE_BACKEND '{}'", other)),
        }
    }
}

/// Attachment storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Write endpoint
    pub endpoint: String,
    /// Base URL stored on posts/comments
    pub public_url: String,
    pub posts_bucket: String,
    pub comments_bucket: String,
}

/// Avatar catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Number of entries; sequence numbers wrap around this
    pub size: u32,
}

/// Archival sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Inactivity after which a thread is archived
    pub window_secs: u64,
    /// Delay between scheduled sweeps
    pub sweep_interval_secs: u64,
}

impl ArchiveConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Size and time bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Ceiling for a single image
    pub image_max_bytes: usize,
    /// Ceiling for all images in one request
    pub request_max_bytes: usize,
    /// Deadline for each remote call
    pub remote_timeout_ms: u64,
}

impl LimitsConfig {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if is_production => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "http://localhost:3000".to_string(),
            };

            if is_production && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if is_production => {
                return Err("DATABASE_URL must be set in production".to_string())
            }
            Err(_) => "postgresql://localhost/board".to_string(),
        };

        let limits = LimitsConfig {
            image_max_bytes: parse_env_or_default("IMAGE_MAX_BYTES", IMAGE_MAX_BYTES)?,
            request_max_bytes: parse_env_or_default("REQUEST_MAX_BYTES", REQUEST_MAX_BYTES)?,
            remote_timeout_ms: parse_env_or_default("REMOTE_TIMEOUT_MS", 5_000)?,
        };
        if limits.image_max_bytes > limits.request_max_bytes {
            return Err(format!(
                "IMAGE_MAX_BYTES ({}) cannot exceed REQUEST_MAX_BYTES ({})",
                limits.image_max_bytes, limits.request_max_bytes
            ));
        }

        let catalog_size: u32 = parse_env_or_default("AVATAR_CATALOG_SIZE", 826)?;
        if catalog_size == 0 {
            return Err("AVATAR_CATALOG_SIZE must be positive".to_string());
        }

        let window_secs: u64 = parse_env_or_default("ARCHIVE_WINDOW_SECS", 900)?;
        if window_secs == 0 {
            return Err("ARCHIVE_WINDOW_SECS must be positive".to_string());
        }

        let sweep_interval_secs: u64 = parse_env_or_default("ARCHIVE_SWEEP_INTERVAL_SECS", 60)?;
        if sweep_interval_secs == 0 {
            return Err("ARCHIVE_SWEEP_INTERVAL_SECS must be positive".to_string());
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("BOARD_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("BOARD_SERVICE_PORT", 8080)?,
            },
            cors,
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 25)?,
                acquire_timeout_secs: parse_env_or_default("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            },
            storage: StorageConfig {
                backend: parse_env_or_default("STORAGE_BACKEND", StorageBackend::Http)?,
                endpoint: std::env::var("STORAGE_ENDPOINT")
                    .unwrap_or_else(|_| "http://triple-s:1414".to_string()),
                public_url: std::env::var("STORAGE_PUBLIC_URL")
                    .unwrap_or_else(|_| "http://localhost:1414".to_string()),
                posts_bucket: std::env::var("STORAGE_POSTS_BUCKET")
                    .unwrap_or_else(|_| "posts".to_string()),
                comments_bucket: std::env::var("STORAGE_COMMENTS_BUCKET")
                    .unwrap_or_else(|_| "comments".to_string()),
            },
            catalog: CatalogConfig {
                base_url: std::env::var("AVATAR_CATALOG_URL")
                    .unwrap_or_else(|_| "https://rickandmortyapi.com/api".to_string()),
                size: catalog_size,
            },
            archive: ArchiveConfig {
                window_secs,
                sweep_interval_secs,
            },
            limits,
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
