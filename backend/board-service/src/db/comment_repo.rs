/// Comment persistence on PostgreSQL
use super::CommentRepository;
use crate::error::Result;
use crate::models::{Comment, Identity, NewComment, SessionToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    image_refs: Vec<String>,
    created_at: DateTime<Utc>,
    session_token: String,
    avatar_url: String,
    character_name: String,
    custom_name: Option<String>,
    author_created_at: DateTime<Utc>,
    author_expires_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            parent_id: row.parent_id,
            author: Identity {
                session_token: SessionToken::new(row.session_token),
                avatar_url: row.avatar_url,
                character_name: row.character_name,
                custom_name: row.custom_name,
                created_at: row.author_created_at,
                expires_at: row.author_expires_at,
            },
            content: row.content,
            image_refs: row.image_refs,
            created_at: row.created_at,
        }
    }
}

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn save(&self, comment: &NewComment) -> Result<Comment> {
        // Insert and activity bump commit together
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO comments (post_id, parent_id, session_token, content, image_refs)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .bind(comment.author.session_token.as_str())
        .bind(&comment.content)
        .bind(&comment.image_refs)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE posts
            SET last_activity_at = GREATEST(last_activity_at, $2)
            WHERE id = $1
            "#,
        )
        .bind(comment.post_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(comment_id = %id, post_id = %comment.post_id, "Inserted comment");

        Ok(Comment {
            id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author: comment.author.clone(),
            content: comment.content.clone(),
            image_refs: comment.image_refs.clone(),
            created_at,
        })
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.post_id, c.parent_id, c.content, c.image_refs, c.created_at,
                   u.session_token, u.avatar_url, u.character_name, u.custom_name,
                   u.created_at AS author_created_at, u.expires_at AS author_expires_at
            FROM comments c
            JOIN user_sessions u ON u.session_token = c.session_token
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
