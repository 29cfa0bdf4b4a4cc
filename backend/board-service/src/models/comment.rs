use super::Identity;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Persisted reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// `None` replies to the thread itself
    pub parent_id: Option<Uuid>,
    pub author: Identity,
    pub content: String,
    pub image_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fully assembled comment awaiting persistence
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewComment {
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author: Identity,
    #[validate(length(max = 10000, message = "content must be at most 10000 characters"))]
    pub content: String,
    pub image_refs: Vec<String>,
}

impl NewComment {
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.content.trim().is_empty() && self.image_refs.is_empty() {
            return Err(AppError::Validation(
                "comment needs text or at least one image".to_string(),
            ));
        }
        Ok(())
    }
}
