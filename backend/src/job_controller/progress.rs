//! Durable progress records for upload jobs.
//!
//! One row in `upload_progress` per job. The worker owns the writes, HTTP
//! pollers only read. Updates assign the named fields in place; a status
//! change is checked against the job state machine so nothing ever leaves
//! `completed` or `failed`.

use crate::db::Database;
use crate::error::CatalogError;
use catalog_common::jobs::{JobStatus, UploadProgress};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Fields to overwrite on a progress record. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressUpdate {
    pub total_rows: Option<u32>,
    pub processed_rows: Option<u32>,
    pub status: Option<JobStatus>,
    pub error_message: Option<String>,
}

impl ProgressUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn processed(rows: u32) -> Self {
        Self {
            processed_rows: Some(rows),
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_total(mut self, rows: u32) -> Self {
        self.total_rows = Some(rows);
        self
    }
}

pub trait ProgressTracker: Send + Sync {
    /// Registers a new job in `pending` with zero counts.
    fn create(&self, job_id: &str) -> Result<UploadProgress, CatalogError>;

    fn get(&self, job_id: &str) -> Result<Option<UploadProgress>, CatalogError>;

    fn update(&self, job_id: &str, update: ProgressUpdate) -> Result<UploadProgress, CatalogError>;
}

#[derive(Clone)]
pub struct SqliteProgressTracker {
    db: Database,
}

impl SqliteProgressTracker {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl ProgressTracker for SqliteProgressTracker {
    fn create(&self, job_id: &str) -> Result<UploadProgress, CatalogError> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO upload_progress (id, total_rows, processed_rows, status, created_at) \
             VALUES (?1, 0, 0, ?2, ?3)",
            params![job_id, JobStatus::Pending.as_str(), Utc::now()],
        )?;
        select(&conn, job_id)?.ok_or_else(|| CatalogError::JobNotFound(job_id.to_string()))
    }

    fn get(&self, job_id: &str) -> Result<Option<UploadProgress>, CatalogError> {
        let conn = self.db.lock()?;
        select(&conn, job_id)
    }

    fn update(&self, job_id: &str, update: ProgressUpdate) -> Result<UploadProgress, CatalogError> {
        let conn = self.db.lock()?;
        let current =
            select(&conn, job_id)?.ok_or_else(|| CatalogError::JobNotFound(job_id.to_string()))?;

        let status = match update.status {
            Some(next) if next != current.status => {
                if !current.status.can_transition_to(next) {
                    return Err(CatalogError::InvalidTransition {
                        job_id: job_id.to_string(),
                        from: current.status,
                        to: next,
                    });
                }
                next
            }
            _ => current.status,
        };

        conn.execute(
            "UPDATE upload_progress SET total_rows = ?1, processed_rows = ?2, status = ?3, \
             error_message = ?4 WHERE id = ?5",
            params![
                update.total_rows.unwrap_or(current.total_rows),
                update.processed_rows.unwrap_or(current.processed_rows),
                status.as_str(),
                update.error_message.or(current.error_message),
                job_id
            ],
        )?;
        select(&conn, job_id)?.ok_or_else(|| CatalogError::JobNotFound(job_id.to_string()))
    }
}

fn select(conn: &Connection, job_id: &str) -> Result<Option<UploadProgress>, CatalogError> {
    Ok(conn
        .query_row(
            "SELECT id, total_rows, processed_rows, status, error_message, created_at \
             FROM upload_progress WHERE id = ?1",
            params![job_id],
            progress_from_row,
        )
        .optional()?)
}

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<UploadProgress> {
    let status: String = row.get(3)?;
    let status = status
        .parse::<JobStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(UploadProgress {
        id: row.get(0)?,
        total_rows: row.get(1)?,
        processed_rows: row.get(2)?,
        status,
        error_message: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> SqliteProgressTracker {
        SqliteProgressTracker::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn create_starts_pending_and_empty() {
        let tracker = tracker();
        let job = tracker.create("upload_1").unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!((job.total_rows, job.processed_rows), (0, 0));
        assert_eq!(job.error_message, None);
        assert_eq!(job.percentage(), 0);
        assert_eq!(tracker.get("upload_1").unwrap(), Some(job));
    }

    #[test]
    fn get_unknown_job_is_none() {
        assert_eq!(tracker().get("nope").unwrap(), None);
    }

    #[test]
    fn update_assigns_only_named_fields() {
        let tracker = tracker();
        tracker.create("upload_1").unwrap();
        tracker
            .update("upload_1", ProgressUpdate::status(JobStatus::Parsing))
            .unwrap();
        tracker
            .update(
                "upload_1",
                ProgressUpdate::status(JobStatus::Processing).with_total(2500),
            )
            .unwrap();
        let job = tracker.update("upload_1", ProgressUpdate::processed(1000)).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.total_rows, 2500);
        assert_eq!(job.processed_rows, 1000);
        assert_eq!(job.percentage(), 40);
    }

    #[test]
    fn terminal_status_cannot_be_left() {
        let tracker = tracker();
        tracker.create("upload_1").unwrap();
        tracker.update("upload_1", ProgressUpdate::failed("bad file")).unwrap();

        let err = tracker
            .update("upload_1", ProgressUpdate::status(JobStatus::Processing))
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidTransition { from: JobStatus::Failed, to: JobStatus::Processing, .. }
        ));
        let job = tracker.get("upload_1").unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("bad file"));
    }

    #[test]
    fn update_of_missing_job_is_not_found() {
        let err = tracker()
            .update("ghost", ProgressUpdate::processed(1))
            .unwrap_err();
        assert!(matches!(err, CatalogError::JobNotFound(id) if id == "ghost"));
    }

    #[test]
    fn duplicate_job_id_is_rejected() {
        let tracker = tracker();
        tracker.create("upload_1").unwrap();
        assert!(matches!(tracker.create("upload_1"), Err(CatalogError::Database(_))));
    }
}
