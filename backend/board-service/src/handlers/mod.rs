/// HTTP handlers for board-service
///
/// This module contains handlers for:
/// - Session: current identity, display-name override
/// - Threads: create, view, active and archived listings
/// - Comments: list and reply (optionally nested)
/// - Archive: explicit sweep trigger
/// - Health: summary and liveness probes
///
/// Handlers only translate HTTP to service calls; every rule lives in
/// `crate::services`.
pub mod archive;
pub mod comments;
pub mod form;
pub mod health;
pub mod session;
pub mod threads;

use crate::error::{AppError, Result};
use crate::models::{Identity, SessionToken, SESSION_TTL_DAYS};
use crate::services::{ArchivalEngine, CommentService, IdentityResolver, ThreadService};
use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{web, HttpRequest};
use serde::Serialize;
use std::sync::Arc;

/// Cookie carrying the opaque session token
pub const SESSION_COOKIE: &str = "session_id";

/// Shared handler state
pub struct AppState {
    pub threads: ThreadService,
    pub comments: CommentService,
    pub identities: Arc<IdentityResolver>,
    pub archival: ArchivalEngine,
    /// Ceiling on cumulative image bytes per request
    pub request_max_bytes: usize,
}

/// Session token from the request cookie, if any
pub fn session_token(req: &HttpRequest) -> Option<SessionToken> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SessionToken::new)
}

/// Session token for write endpoints; a missing cookie is an unknown session
pub fn require_session(req: &HttpRequest) -> Result<SessionToken> {
    session_token(req).ok_or(AppError::UnknownSession)
}

pub fn session_cookie(token: &SessionToken) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.as_str().to_string())
        .path("/")
        .max_age(CookieDuration::days(SESSION_TTL_DAYS))
        .http_only(true)
        .finish()
}

/// Public view of an identity; the token is never echoed back
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub name: String,
    pub avatar_url: String,
}

impl From<&Identity> for AuthorResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            name: identity.display_name().to_string(),
            avatar_url: identity.avatar_url.clone(),
        }
    }
}

/// Register every board route. Health probes live in `health::configure`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/session")
            .route("/me", web::get().to(session::get_me))
            .route("/name", web::put().to(session::rename)),
    )
    .service(
        web::scope("/threads")
            .service(
                web::resource("")
                    .route(web::get().to(threads::list_active))
                    .route(web::post().to(threads::create_thread)),
            )
            // before `/{id}` so "archive" is never parsed as an id
            .route("/archive", web::get().to(threads::list_archived))
            .route("/{id}", web::get().to(threads::get_thread))
            .service(
                web::resource("/{id}/comments")
                    .route(web::get().to(comments::list_comments))
                    .route(web::post().to(comments::create_comment)),
            ),
    )
    .route("/archive/sweep", web::post().to(archive::sweep));
}
