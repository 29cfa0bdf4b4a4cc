/// Thread handlers - HTTP endpoints for posts
use super::form::read_form;
use super::{require_session, AppState, AuthorResponse};
use crate::error::Result;
use crate::models::{Post, PostStatus};
use crate::services::CreatePost;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author: AuthorResponse,
    pub title: String,
    pub content: String,
    pub image_refs: Vec<String>,
    pub status: PostStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            author: AuthorResponse::from(&post.author),
            status: post.status(),
            is_archived: post.is_archived(),
            id: post.id,
            title: post.title,
            content: post.content,
            image_refs: post.image_refs,
            created_at: post.created_at,
            last_activity_at: post.last_activity_at,
            archived_at: post.archived_at,
        }
    }
}

fn to_responses(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(PostResponse::from).collect()
}

/// Active threads, newest first
pub async fn list_active(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.threads.list_active().await?;
    Ok(HttpResponse::Ok().json(to_responses(posts)))
}

/// Archived threads, most recently archived first
pub async fn list_archived(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.threads.list_archived().await?;
    Ok(HttpResponse::Ok().json(to_responses(posts)))
}

/// Get a thread by ID, active or archived
pub async fn get_thread(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state.threads.get_by_id(*post_id).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Create a thread from a multipart form (`title`, `content`, `images`)
pub async fn create_thread(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let token = require_session(&req)?;
    let form = read_form(payload, state.request_max_bytes).await?;

    let request = CreatePost {
        title: form.text("title").unwrap_or_default().to_string(),
        content: form.text("content").unwrap_or_default().to_string(),
        images: form.images,
    };

    let post = state.threads.create_post(&token, request).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}
