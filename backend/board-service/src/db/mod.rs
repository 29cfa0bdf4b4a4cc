/// Database access layer
///
/// This module provides:
/// - Repository contracts the services depend on
/// - PostgreSQL implementations of those contracts
/// - Connection pool construction and migrations
pub mod comment_repo;
pub mod identity_repo;
pub mod post_repo;

pub use comment_repo::PgCommentRepository;
pub use identity_repo::PgIdentityRepository;
pub use post_repo::PgPostRepository;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{CatalogEntry, Comment, Identity, NewComment, NewPost, Post, SessionToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

/// Thread storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a validated post; id and timestamps are assigned here.
    async fn save(&self, post: &NewPost) -> Result<Post>;

    /// Fetch a post regardless of archive state. `NotFound` when absent.
    async fn find_by_id(&self, id: Uuid) -> Result<Post>;

    /// Active posts, newest first
    async fn list_active(&self) -> Result<Vec<Post>>;

    /// Archived posts, most recently archived first
    async fn list_archived(&self) -> Result<Vec<Post>>;

    /// Archive every active post whose last activity (own creation or any
    /// comment) is at or before `cutoff`, stamping `archived_at = now`.
    /// Returns the number of posts archived.
    async fn archive_stale(&self, cutoff: DateTime<Utc>, now: DateTime<Utc>) -> Result<u64>;
}

/// Comment storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a comment and bump the owning post's `last_activity_at`.
    async fn save(&self, comment: &NewComment) -> Result<Comment>;

    /// Comments of a post, oldest first
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;
}

/// Anonymous identity storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Persist a new identity and return its freshly minted token.
    async fn save(&self, entry: &CatalogEntry) -> Result<SessionToken>;

    async fn find_by_token(&self, token: &SessionToken) -> Result<Option<Identity>>;

    /// Set the display-name override. `UnknownSession` when the token is absent.
    async fn rename(&self, token: &SessionToken, new_name: &str) -> Result<()>;

    /// Total identities ever created
    async fn count(&self) -> Result<u64>;
}

/// Create the PostgreSQL pool
pub async fn create_pool(cfg: &DatabaseConfig) -> std::result::Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect(&cfg.url)
        .await?;

    tracing::info!(
        max_connections = cfg.max_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Apply pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
