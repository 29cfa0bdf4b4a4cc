/// Comment handlers - replies to threads
use super::form::read_form;
use super::{require_session, AppState, AuthorResponse};
use crate::error::{AppError, Result};
use crate::models::Comment;
use crate::services::CreateComment;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author: AuthorResponse,
    pub content: String,
    pub image_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            author: AuthorResponse::from(&comment.author),
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            content: comment.content,
            image_refs: comment.image_refs,
            created_at: comment.created_at,
        }
    }
}

/// Comments of a thread, oldest first
pub async fn list_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = state.comments.list_by_post(*post_id).await?;
    let body: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Reply to a thread from a multipart form (`content`, `parent_id`, `images`)
pub async fn create_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let token = require_session(&req)?;
    let form = read_form(payload, state.request_max_bytes).await?;

    let parent_id = form
        .non_empty("parent_id")
        .map(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| AppError::BadRequest(format!("invalid parent_id '{}'", raw)))
        })
        .transpose()?;

    let request = CreateComment {
        post_id: post_id.into_inner(),
        parent_id,
        content: form.text("content").unwrap_or_default().to_string(),
        images: form.images,
    };

    let comment = state.comments.create_comment(&token, request).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}
