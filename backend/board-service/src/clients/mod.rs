/// Clients for the remote collaborators: the avatar catalog and object storage.
pub mod avatar_catalog;
pub mod object_storage;

pub use avatar_catalog::{AvatarCatalog, HttpAvatarCatalog};
pub use object_storage::{HttpObjectStorage, ObjectStorage, S3ObjectStorage};

use crate::error::{AppError, Result};
use std::future::Future;
use std::time::Duration;

/// Bound a remote call by `deadline`. An elapsed deadline is reported
/// through `on_timeout`, producing the same error kind as a remote failure.
pub async fn with_deadline<F, T>(
    deadline: Duration,
    future: F,
    on_timeout: fn(String) -> AppError,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, future).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(format!(
            "timed out after {}ms",
            deadline.as_millis()
        ))),
    }
}
