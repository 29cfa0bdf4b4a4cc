/// Thread service - post creation, retrieval, and listings
///
/// Creation runs as a short pipeline with early exit:
/// images -> identity -> assemble -> validate -> persist.
/// Nothing reaches the post repository unless every earlier step succeeded.
use crate::db::PostRepository;
use crate::error::Result;
use crate::models::{ImageUpload, NewPost, Post, SessionToken};
use crate::services::{AttachmentPipeline, IdentityResolver};
use std::sync::Arc;
use uuid::Uuid;

/// Client input for a new thread
#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub images: Vec<ImageUpload>,
}

#[derive(Clone)]
pub struct ThreadService {
    posts: Arc<dyn PostRepository>,
    identities: Arc<IdentityResolver>,
    attachments: AttachmentPipeline,
    bucket: String,
}

impl ThreadService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        identities: Arc<IdentityResolver>,
        attachments: AttachmentPipeline,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            posts,
            identities,
            attachments,
            bucket: bucket.into(),
        }
    }

    /// Create a new post on behalf of the session holder
    pub async fn create_post(&self, token: &SessionToken, request: CreatePost) -> Result<Post> {
        let image_count = request.images.len();
        let image_refs = self
            .attachments
            .process_all(request.images, &self.bucket)
            .await?;

        let author = self.identities.resolve(token).await?;

        let new_post = NewPost {
            author,
            title: request.title.trim().to_string(),
            content: request.content,
            image_refs,
        };
        new_post.check()?;

        let post = self.posts.save(&new_post).await?;

        tracing::info!(
            post_id = %post.id,
            images = image_count,
            "Created post"
        );
        Ok(post)
    }

    /// Get a post by ID; archived posts are returned too
    pub async fn get_by_id(&self, id: Uuid) -> Result<Post> {
        self.posts.find_by_id(id).await
    }

    pub async fn list_active(&self) -> Result<Vec<Post>> {
        self.posts.list_active().await
    }

    pub async fn list_archived(&self) -> Result<Vec<Post>> {
        self.posts.list_archived().await
    }
}
