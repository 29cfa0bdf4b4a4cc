/// Post persistence on PostgreSQL
use super::PostRepository;
use crate::error::{AppError, Result};
use crate::models::{Identity, NewPost, Post, SessionToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = r#"
    p.id, p.title, p.content, p.image_refs, p.created_at, p.last_activity_at, p.archived_at,
    u.session_token, u.avatar_url, u.character_name, u.custom_name,
    u.created_at AS author_created_at, u.expires_at AS author_expires_at
"#;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    image_refs: Vec<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
    session_token: String,
    avatar_url: String,
    character_name: String,
    custom_name: Option<String>,
    author_created_at: DateTime<Utc>,
    author_expires_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            author: Identity {
                session_token: SessionToken::new(row.session_token),
                avatar_url: row.avatar_url,
                character_name: row.character_name,
                custom_name: row.custom_name,
                created_at: row.author_created_at,
                expires_at: row.author_expires_at,
            },
            title: row.title,
            content: row.content,
            image_refs: row.image_refs,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            archived_at: row.archived_at,
        }
    }
}

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, filter: &str, order: &str) -> Result<Vec<Post>> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             JOIN user_sessions u ON u.session_token = p.session_token \
             WHERE {filter} ORDER BY {order}"
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn save(&self, post: &NewPost) -> Result<Post> {
        let (id, created_at, last_activity_at): (Uuid, DateTime<Utc>, DateTime<Utc>) =
            sqlx::query_as(
                r#"
                INSERT INTO posts (session_token, title, content, image_refs)
                VALUES ($1, $2, $3, $4)
                RETURNING id, created_at, last_activity_at
                "#,
            )
            .bind(post.author.session_token.as_str())
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.image_refs)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(post_id = %id, "Inserted post");

        Ok(Post {
            id,
            author: post.author.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            image_refs: post.image_refs.clone(),
            created_at,
            last_activity_at,
            archived_at: None,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Post> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             JOIN user_sessions u ON u.session_token = p.session_token \
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Post::from)
            .ok_or_else(|| AppError::NotFound(format!("post {}", id)))
    }

    async fn list_active(&self) -> Result<Vec<Post>> {
        self.list_where("p.is_archived = FALSE", "p.created_at DESC")
            .await
    }

    async fn list_archived(&self) -> Result<Vec<Post>> {
        self.list_where("p.is_archived = TRUE", "p.archived_at DESC")
            .await
    }

    async fn archive_stale(&self, cutoff: DateTime<Utc>, now: DateTime<Utc>) -> Result<u64> {
        // Comment activity is re-derived here, not trusted from last_activity_at
        let result = sqlx::query(
            r#"
            UPDATE posts p
            SET is_archived = TRUE, archived_at = $2
            WHERE p.is_archived = FALSE
              AND GREATEST(
                    p.last_activity_at,
                    p.created_at,
                    COALESCE(
                        (SELECT MAX(c.created_at) FROM comments c WHERE c.post_id = p.id),
                        p.created_at
                    )
                  ) <= $1
            "#,
        )
        .bind(cutoff)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
