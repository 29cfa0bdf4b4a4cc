/// Comment service - replies and nested replies
///
/// Shares the thread pipeline: images -> identity -> assemble -> validate ->
/// persist. The repository bumps the owning post's activity in the same
/// write as the insert.
use crate::db::CommentRepository;
use crate::error::Result;
use crate::models::{Comment, ImageUpload, NewComment, SessionToken};
use crate::services::{AttachmentPipeline, IdentityResolver};
use std::sync::Arc;
use uuid::Uuid;

/// Client input for a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub post_id: Uuid,
    /// Comment being replied to, within the same thread
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub images: Vec<ImageUpload>,
}

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    identities: Arc<IdentityResolver>,
    attachments: AttachmentPipeline,
    bucket: String,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        identities: Arc<IdentityResolver>,
        attachments: AttachmentPipeline,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            comments,
            identities,
            attachments,
            bucket: bucket.into(),
        }
    }

    /// Create a comment on a post, optionally as a reply to another comment.
    ///
    /// A missing post or a parent outside the thread surfaces as `NotFound`
    /// from the repository.
    pub async fn create_comment(
        &self,
        token: &SessionToken,
        request: CreateComment,
    ) -> Result<Comment> {
        let image_refs = self
            .attachments
            .process_all(request.images, &self.bucket)
            .await?;

        let author = self.identities.resolve(token).await?;

        let new_comment = NewComment {
            post_id: request.post_id,
            parent_id: request.parent_id,
            author,
            content: request.content,
            image_refs,
        };
        new_comment.check()?;

        let comment = self.comments.save(&new_comment).await.map_err(|e| {
            tracing::warn!(
                post_id = %new_comment.post_id,
                parent_id = ?new_comment.parent_id,
                error = %e,
                "Failed to save comment"
            );
            e
        })?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            nested = comment.parent_id.is_some(),
            "Created comment"
        );
        Ok(comment)
    }

    /// Comments of a post, oldest first
    pub async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.comments.find_by_post(post_id).await
    }
}
