//! The ingestion batch loop.
//!
//! A job moves `pending -> parsing -> processing -> completed`. Each batch is
//! one store transaction followed by one progress write and one
//! notification, strictly in that order, so a poller never sees
//! `processed_rows` go backwards or run ahead of committed data.
//!
//! Any error after the job has been claimed marks it `failed` with the error
//! text and is returned to the caller. Batches committed before the error
//! stay committed. There is no resume: a crash between a batch commit and its
//! progress write leaves that batch applied but uncounted.

use super::parse::{parse_rows, validate_header, UploadRow};
use super::BATCH_SIZE;
use crate::error::CatalogError;
use crate::job_controller::progress::{ProgressTracker, ProgressUpdate};
use crate::notifications::{NotificationEvent, Notifier};
use crate::store::ProductStore;
use catalog_common::jobs::JobStatus;
use catalog_common::model::product::ProductInput;
use log::{debug, error, info};
use std::sync::Arc;

/// What a finished job did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub job_id: String,
    pub total_rows: u32,
    /// Rows handed to the store.
    pub upserted: usize,
    /// Rows dropped for a blank key.
    pub skipped: usize,
    pub batches: usize,
}

pub struct IngestionWorker {
    store: Arc<dyn ProductStore>,
    progress: Arc<dyn ProgressTracker>,
    notifier: Arc<dyn Notifier>,
    batch_size: usize,
}

impl IngestionWorker {
    pub fn new(
        store: Arc<dyn ProductStore>,
        progress: Arc<dyn ProgressTracker>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            progress,
            notifier,
            batch_size: BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ingests `content` for the pre-created job `job_id`.
    ///
    /// Blocking; run it on a blocking thread.
    pub fn run(&self, content: &str, job_id: &str) -> Result<IngestSummary, CatalogError> {
        let job = match self.progress.get(job_id) {
            Ok(Some(job)) => job,
            Ok(None) => {
                error!("upload {}: no progress record, nothing to ingest into", job_id);
                return Err(CatalogError::JobNotFound(job_id.to_string()));
            }
            Err(e) => {
                error!("upload {}: progress record unreadable: {}", job_id, e);
                return Err(e);
            }
        };
        if job.status != JobStatus::Pending {
            return Err(CatalogError::InvalidTransition {
                job_id: job_id.to_string(),
                from: job.status,
                to: JobStatus::Parsing,
            });
        }

        info!("upload {}: ingestion started", job_id);
        match self.ingest(content, job_id) {
            Ok(summary) => {
                info!(
                    "upload {}: completed, {} rows in {} batches ({} skipped)",
                    job_id, summary.total_rows, summary.batches, summary.skipped
                );
                Ok(summary)
            }
            Err(e) => {
                self.mark_failed(job_id, &e);
                Err(e)
            }
        }
    }

    fn ingest(&self, content: &str, job_id: &str) -> Result<IngestSummary, CatalogError> {
        self.progress
            .update(job_id, ProgressUpdate::status(JobStatus::Parsing))?;

        validate_header(content)?;
        let rows = parse_rows(content)?;
        let total_rows = u32::try_from(rows.len())
            .map_err(|_| CatalogError::InvalidUpload(format!("too many rows: {}", rows.len())))?;
        self.progress.update(
            job_id,
            ProgressUpdate::status(JobStatus::Processing).with_total(total_rows),
        )?;

        let mut summary = IngestSummary {
            job_id: job_id.to_string(),
            total_rows,
            upserted: 0,
            skipped: 0,
            batches: 0,
        };
        let mut processed: u32 = 0;

        for (batch_index, batch) in rows.chunks(self.batch_size).enumerate() {
            let inputs: Vec<ProductInput> = batch.iter().filter_map(UploadRow::to_input).collect();
            summary.skipped += batch.len() - inputs.len();
            summary.upserted += self.store.upsert_batch(&inputs)?;

            // Fits: the sum of batch lengths never exceeds `total_rows`.
            processed += batch.len() as u32;
            self.progress
                .update(job_id, ProgressUpdate::processed(processed))?;

            self.notifier
                .notify(NotificationEvent::product_imported(batch_index));
            summary.batches += 1;
            debug!(
                "upload {}: batch {} committed, {}/{} rows",
                job_id, batch_index, processed, total_rows
            );
        }

        self.progress
            .update(job_id, ProgressUpdate::status(JobStatus::Completed))?;
        Ok(summary)
    }

    fn mark_failed(&self, job_id: &str, err: &CatalogError) {
        error!("upload {}: failed: {}", job_id, err);
        if let Err(e) = self
            .progress
            .update(job_id, ProgressUpdate::failed(err.to_string()))
        {
            error!("upload {}: could not record failure: {}", job_id, e);
        }
    }
}
