//! Bulk CSV uploads and their progress.
//!
//! - `POST /api/upload`: multipart/form-data with a `file` field holding a
//!   `.csv` file. The header is checked synchronously; the rows are ingested
//!   by a background job. Responds `{"upload_id": ...}` immediately.
//! - `GET /api/upload/{upload_id}/progress`: the job's
//!   `{status, total, processed, percentage, error}`, or 404.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod get_status;
mod upload;

const API_PATH: &str = "/api/upload";

/// Largest accepted upload body, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(upload::process))
        .route("/{upload_id}/progress", get().to(get_status::process))
}
