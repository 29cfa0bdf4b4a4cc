use super::Identity;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

/// Shortest accepted title, surrounding whitespace excluded
pub const TITLE_MIN_CHARS: usize = 5;

/// Lifecycle state of a thread. `Archived` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Active,
    Archived,
}

/// Persisted thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub author: Identity,
    pub title: String,
    pub content: String,
    pub image_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    /// Set exactly when the post is archived
    pub archived_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn status(&self) -> PostStatus {
        match self.archived_at {
            Some(_) => PostStatus::Archived,
            None => PostStatus::Active,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status() == PostStatus::Archived
    }

    /// `Active -> Archived`. Returns false when already archived.
    pub fn archive(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_archived() {
            return false;
        }
        self.archived_at = Some(now);
        true
    }
}

/// Fully assembled post awaiting persistence
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPost {
    pub author: Identity,
    #[validate(length(
        min = 5,
        max = 200,
        message = "title must be between 5 and 200 characters"
    ))]
    pub title: String,
    #[validate(length(max = 10000, message = "content must be at most 10000 characters"))]
    pub content: String,
    pub image_refs: Vec<String>,
}

impl NewPost {
    /// Enforce title/content rules before anything is written.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.title.trim().chars().count() < TITLE_MIN_CHARS {
            return Err(AppError::Validation(format!(
                "title must have at least {} non-blank characters",
                TITLE_MIN_CHARS
            )));
        }
        Ok(())
    }
}
