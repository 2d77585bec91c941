use catalog_common::jobs::JobStatus;

/// Every failure the catalog backend can report.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("upload job {0} not found")]
    JobNotFound(String),

    #[error("upload job {job_id} cannot move from {from} to {to}")]
    InvalidTransition {
        job_id: String,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("webhook {0} not found")]
    WebhookNotFound(i64),

    #[error("SKU already exists: {0}")]
    DuplicateSku(String),

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error("background task failed: {0}")]
    Join(String),
}

impl CatalogError {
    /// Errors caused by the request itself rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateSku(_)
                | CatalogError::InvalidUpload(_)
                | CatalogError::Validation(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::JobNotFound(_)
                | CatalogError::ProductNotFound(_)
                | CatalogError::WebhookNotFound(_)
        )
    }
}
