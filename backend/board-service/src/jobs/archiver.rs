//! Archiver Background Job
//!
//! Periodically sweeps inactive threads into the archive. A failed sweep is
//! logged and the next tick tries again; archived threads are never revisited.

use crate::services::ArchivalEngine;
use std::time::{Duration, Instant};
use tokio::time::sleep;

pub async fn start_archiver(engine: ArchivalEngine, interval: Duration) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        window_secs = engine.window().num_seconds(),
        "Starting archiver background job"
    );

    loop {
        sleep(interval).await;

        let cycle_start = Instant::now();
        match engine.sweep().await {
            Ok(report) => {
                tracing::info!(
                    archived = report.archived,
                    duration_ms = cycle_start.elapsed().as_millis(),
                    "Archive sweep completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    duration_ms = cycle_start.elapsed().as_millis(),
                    "Archive sweep failed; retrying next cycle"
                );
            }
        }
    }
}
