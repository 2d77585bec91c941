//! Scheduling of upload jobs outside the request/response cycle.
//!
//! `JobsState` is the front door for bulk uploads. It is cloned into the
//! Actix application state and:
//! - validates the upload header synchronously, so a file that could never
//!   ingest is rejected with the request instead of as a failed job;
//! - registers a `pending` progress record under a fresh job id, off the
//!   async executor;
//! - spawns a supervising Tokio task that runs the [`IngestionWorker`] on the
//!   blocking pool, and returns the job id at once.
//!
//! Jobs are independent: no ordering between them and no concurrency cap
//! beyond the blocking pool. There is no cancellation.

use crate::error::CatalogError;
use crate::ingest::{validate_header, IngestSummary, IngestionWorker};
use crate::job_controller::progress::{ProgressTracker, ProgressUpdate};
use log::{error, info};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Clone)]
pub struct JobsState {
    /// Shared with the progress endpoint, which only reads.
    pub progress: Arc<dyn ProgressTracker>,
    worker: Arc<IngestionWorker>,
}

impl JobsState {
    pub fn new(progress: Arc<dyn ProgressTracker>, worker: Arc<IngestionWorker>) -> Self {
        Self { progress, worker }
    }

    /// Accepts an upload and schedules its ingestion. Returns the job id.
    ///
    /// The progress record is written on the blocking pool, so a caller on
    /// the async executor never waits on the database lock.
    pub async fn submit(&self, content: String) -> Result<String, CatalogError> {
        validate_header(&content)?;
        let job_id = format!("upload_{}", Uuid::new_v4().simple());

        let progress = self.progress.clone();
        let record_id = job_id.clone();
        tokio::task::spawn_blocking(move || progress.create(&record_id))
            .await
            .map_err(|e| CatalogError::Join(e.to_string()))??;
        info!("upload {}: queued ({} bytes)", job_id, content.len());
        self.schedule(content, job_id.clone());
        Ok(job_id)
    }

    /// Runs the worker for an existing job in the background.
    ///
    /// The handle resolves to the worker's outcome. Failures are also logged
    /// here, so dropping the handle never hides them.
    pub fn schedule(
        &self,
        content: String,
        job_id: String,
    ) -> JoinHandle<Result<IngestSummary, CatalogError>> {
        let worker = self.worker.clone();
        let progress = self.progress.clone();

        tokio::spawn(async move {
            let job_id_for_blocking = job_id.clone();
            let handle =
                tokio::task::spawn_blocking(move || worker.run(&content, &job_id_for_blocking));

            match handle.await {
                Ok(Ok(summary)) => Ok(summary),
                Ok(Err(e)) => {
                    error!("upload {}: job failed: {}", job_id, e);
                    Err(e)
                }
                Err(join_err) => {
                    // The worker panicked before it could record anything.
                    let message = format!("join error: {}", join_err);
                    if let Err(e) = progress.update(&job_id, ProgressUpdate::failed(&message)) {
                        error!("upload {}: could not record failure: {}", job_id, e);
                    }
                    error!("upload {}: {}", job_id, message);
                    Err(CatalogError::Join(message))
                }
            }
        })
    }
}
