/// Data models for board-service
///
/// - Identity: anonymous session-bound user with a catalog-assigned avatar
/// - Post: thread with optional image attachments, active or archived
/// - Comment: reply to a thread, optionally nested under another comment
pub mod comment;
pub mod identity;
pub mod post;

pub use comment::{Comment, NewComment};
pub use identity::{CatalogEntry, Identity, SessionToken, SESSION_TTL_DAYS};
pub use post::{NewPost, Post, PostStatus};

/// Raw image payload as received from the client, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}
