/// Archival engine - moves inactive threads to the archive
///
/// A post is stale once `now - last_activity >= window`, where last activity
/// is the latest of the post's own creation and its comments' creation.
/// Archived is terminal; a sweep never revives a thread.
use crate::db::PostRepository;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub archived: u64,
    /// Posts with no activity after this instant were archived
    pub cutoff: DateTime<Utc>,
    pub swept_at: DateTime<Utc>,
}

/// Latest activity on a thread
pub fn last_activity_of<I>(created_at: DateTime<Utc>, comment_times: I) -> DateTime<Utc>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    comment_times.into_iter().fold(created_at, |latest, t| latest.max(t))
}

pub fn is_stale(last_activity: DateTime<Utc>, now: DateTime<Utc>, window: chrono::Duration) -> bool {
    now - last_activity >= window
}

#[derive(Clone)]
pub struct ArchivalEngine {
    posts: Arc<dyn PostRepository>,
    window: chrono::Duration,
}

impl ArchivalEngine {
    pub fn new(posts: Arc<dyn PostRepository>, window: Duration) -> Self {
        let window =
            chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::max_value());
        Self { posts, window }
    }

    pub fn window(&self) -> chrono::Duration {
        self.window
    }

    /// Sweep against the current clock
    pub async fn sweep(&self) -> Result<SweepReport> {
        self.sweep_at(Utc::now()).await
    }

    /// Archive every active post whose last activity is at or before
    /// `now - window`. A repository failure aborts the whole sweep.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let cutoff = now
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let archived = self.posts.archive_stale(cutoff, now).await.map_err(|e| {
            tracing::error!(cutoff = %cutoff, error = %e, "Archive sweep failed");
            e
        })?;

        if archived > 0 {
            tracing::info!(archived, cutoff = %cutoff, "Archived inactive threads");
        } else {
            tracing::debug!(cutoff = %cutoff, "No inactive threads to archive");
        }

        Ok(SweepReport {
            archived,
            cutoff,
            swept_at: now,
        })
    }
}
