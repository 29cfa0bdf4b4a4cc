/// Identity resolver - anonymous sessions
///
/// A session token maps to exactly one identity. New identities take their
/// avatar and name from the catalog entry at sequence `count + 1`, wrapped
/// around the catalog size so assignment cycles instead of failing.
use crate::clients::{with_deadline, AvatarCatalog};
use crate::db::IdentityRepository;
use crate::error::{AppError, Result};
use crate::models::{Identity, SessionToken};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Longest accepted display-name override
pub const MAX_NAME_CHARS: usize = 50;

/// Reduce a 1-based sequence number into `1..=catalog_size`.
///
/// A remainder of 0 is the catalog's last entry (there is no entry 0).
pub fn catalog_index(sequence: u64, catalog_size: u32) -> u32 {
    let size = u64::from(catalog_size.max(1));
    match sequence % size {
        0 => size as u32,
        rem => rem as u32,
    }
}

pub struct IdentityResolver {
    repo: Arc<dyn IdentityRepository>,
    catalog: Arc<dyn AvatarCatalog>,
    catalog_size: u32,
    remote_timeout: Duration,
}

impl IdentityResolver {
    pub fn new(
        repo: Arc<dyn IdentityRepository>,
        catalog: Arc<dyn AvatarCatalog>,
        catalog_size: u32,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            catalog,
            catalog_size,
            remote_timeout,
        }
    }

    /// Look up the identity behind a token
    pub async fn resolve(&self, token: &SessionToken) -> Result<Identity> {
        let identity = self
            .repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::UnknownSession)?;

        // Expiry is advisory; the session keeps working.
        if identity.is_expired(Utc::now()) {
            tracing::debug!(expires_at = %identity.expires_at, "Session past expiry");
        }
        Ok(identity)
    }

    /// Mint a new identity from the next catalog entry
    pub async fn create(&self) -> Result<(SessionToken, Identity)> {
        let count = self.repo.count().await?;
        let sequence = count + 1;
        let index = catalog_index(sequence, self.catalog_size);

        let entry = with_deadline(
            self.remote_timeout,
            self.catalog.lookup(index),
            AppError::AvatarUnavailable,
        )
        .await
        .map_err(|e| {
            tracing::error!(sequence, index, error = %e, "Failed to fetch avatar");
            e
        })?;

        let token = self.repo.save(&entry).await?;
        let identity = self.repo.find_by_token(&token).await?.ok_or_else(|| {
            AppError::Persistence("identity not readable after creation".to_string())
        })?;

        tracing::info!(
            sequence,
            index,
            name = %identity.character_name,
            "Created anonymous identity"
        );
        Ok((token, identity))
    }

    /// Resolve `token` when present and known, otherwise create a new identity.
    /// The flag is true when a new identity was minted.
    pub async fn resolve_or_create(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<(SessionToken, Identity, bool)> {
        if let Some(token) = token {
            match self.resolve(token).await {
                Ok(identity) => return Ok((token.clone(), identity, false)),
                Err(AppError::UnknownSession) => {
                    tracing::debug!("Session token not recognised, minting a new identity");
                }
                Err(e) => return Err(e),
            }
        }

        let (token, identity) = self.create().await?;
        Ok((token, identity, true))
    }

    /// Override the display name
    pub async fn rename(&self, token: &SessionToken, new_name: &str) -> Result<()> {
        let name = new_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidName("name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(AppError::InvalidName(format!(
                "name must be at most {} characters",
                MAX_NAME_CHARS
            )));
        }

        self.repo.rename(token, name).await
    }
}
