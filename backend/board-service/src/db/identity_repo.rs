/// Identity persistence on PostgreSQL
use super::IdentityRepository;
use crate::error::{AppError, Result};
use crate::models::{CatalogEntry, Identity, SessionToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct IdentityRow {
    session_token: String,
    avatar_url: String,
    character_name: String,
    custom_name: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            session_token: SessionToken::new(row.session_token),
            avatar_url: row.avatar_url,
            character_name: row.character_name,
            custom_name: row.custom_name,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    async fn save(&self, entry: &CatalogEntry) -> Result<SessionToken> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO user_sessions (session_token, avatar_url, character_name, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&token)
        .bind(&entry.avatar_url)
        .bind(&entry.name)
        .bind(now)
        .bind(Identity::expiry_for(now))
        .execute(&self.pool)
        .await?;

        Ok(SessionToken::new(token))
    }

    async fn find_by_token(&self, token: &SessionToken) -> Result<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT session_token, avatar_url, character_name, custom_name, created_at, expires_at
            FROM user_sessions
            WHERE session_token = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn rename(&self, token: &SessionToken, new_name: &str) -> Result<()> {
        let result = sqlx::query("UPDATE user_sessions SET custom_name = $1 WHERE session_token = $2")
            .bind(new_name)
            .bind(token.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UnknownSession);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}
