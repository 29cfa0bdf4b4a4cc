/// Session handlers - anonymous identity endpoints
use super::{require_session, session_cookie, session_token, AppState};
use crate::error::Result;
use crate::models::Identity;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    /// Display name: the override when set, otherwise the character name
    pub name: String,
    pub character_name: String,
    pub avatar_url: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            name: identity.display_name().to_string(),
            character_name: identity.character_name.clone(),
            avatar_url: identity.avatar_url.clone(),
            expires_at: identity.expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// Current identity; mints one (and sets the cookie) when the session is
/// missing or unknown.
pub async fn get_me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let existing = session_token(&req);
    let (token, identity, created) = state
        .identities
        .resolve_or_create(existing.as_ref())
        .await?;

    let mut response = HttpResponse::Ok();
    if created {
        response.cookie(session_cookie(&token));
    }
    Ok(response.json(IdentityResponse::from(&identity)))
}

/// Override the display name of the current identity
pub async fn rename(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RenameRequest>,
) -> Result<HttpResponse> {
    let token = require_session(&req)?;
    state.identities.rename(&token, &body.name).await?;

    let identity = state.identities.resolve(&token).await?;
    tracing::info!(name = %identity.display_name(), "Identity renamed");
    Ok(HttpResponse::Ok().json(IdentityResponse::from(&identity)))
}
