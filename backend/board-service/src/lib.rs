/// Board Service Library
///
/// An anonymous imageboard backend: visitors receive a catalog-assigned
/// identity bound to a session cookie, start threads with optional images,
/// and reply with nested comments. Threads with no activity inside the
/// archive window move from the active feed to the archive.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers (actix-web)
/// - `models`: Identities, posts, comments
/// - `services`: Attachment pipeline, identity resolver, thread/comment
///   services, archival engine
/// - `db`: Repository contracts and their PostgreSQL implementations
/// - `clients`: Avatar catalog and object storage collaborators
/// - `jobs`: Periodic archive sweep
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
