/// Business logic layer for board-service
///
/// - Attachment pipeline: image validation and storage
/// - Identity resolver: anonymous sessions backed by the avatar catalog
/// - Thread service: post creation, lookup, active/archived listings
/// - Comment service: replies and nested replies
/// - Archival engine: moves inactive threads to the archive
pub mod archival;
pub mod attachments;
pub mod comments;
pub mod identity;
pub mod threads;

pub use archival::{ArchivalEngine, SweepReport};
pub use attachments::AttachmentPipeline;
pub use comments::{CommentService, CreateComment};
pub use identity::IdentityResolver;
pub use threads::{CreatePost, ThreadService};
