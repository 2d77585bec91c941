//! Lifecycle of a bulk upload job, as recorded in `upload_progress`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Parsing,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Parsing => "parsing",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether a job in `self` may move to `next`.
    ///
    /// ```text
    /// pending -> parsing -> processing -> completed
    /// pending | parsing | processing -> failed
    /// ```
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Parsing)
                | (JobStatus::Parsing, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Parsing, JobStatus::Failed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJobStatus(pub String);

impl fmt::Display for UnknownJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown job status '{}'", self.0)
    }
}

impl std::error::Error for UnknownJobStatus {}

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "parsing" => Ok(JobStatus::Parsing),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(UnknownJobStatus(other.to_string())),
        }
    }
}

/// Durable progress record of one upload job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub id: String,
    pub total_rows: u32,
    pub processed_rows: u32,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UploadProgress {
    pub fn percentage(&self) -> u32 {
        percentage(self.processed_rows, self.total_rows)
    }

    pub fn report(&self) -> ProgressReport {
        ProgressReport {
            status: self.status,
            total: self.total_rows,
            processed: self.processed_rows,
            percentage: self.percentage(),
            error: self.error_message.clone(),
        }
    }
}

/// Body of `GET /api/upload/{upload_id}/progress`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub status: JobStatus,
    pub total: u32,
    pub processed: u32,
    pub percentage: u32,
    pub error: Option<String>,
}

/// `floor(processed / total * 100)`, or 0 while the total is unknown.
pub fn percentage(processed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (u64::from(processed) * 100 / u64::from(total)) as u32
}
