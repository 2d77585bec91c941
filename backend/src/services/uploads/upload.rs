use super::UploadLimit;
use crate::error::CatalogError;
use crate::job_controller::state::JobsState;
use crate::services::error_response;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::StreamExt;

/// HTTP handler wrapper that converts the submission result to a response.
///
/// - On success: `200 OK` with `{"upload_id": ...}`.
/// - On a rejected upload: `400 Bad Request` with the reason.
pub(crate) async fn process(
    payload: Multipart,
    jobs: web::Data<JobsState>,
    limit: web::Data<UploadLimit>,
) -> impl Responder {
    let submitted = match read_csv_upload(payload, limit.0).await {
        Ok(content) => jobs.submit(content).await,
        Err(e) => Err(e),
    };
    match submitted {
        Ok(upload_id) => HttpResponse::Ok().json(serde_json::json!({ "upload_id": upload_id })),
        Err(e) => error_response(&e),
    }
}

/// Reads the `file` part of the form into a string.
///
/// The file name must end with `.csv` and the body must be UTF-8 and no
/// larger than `limit` bytes. Other parts are drained and ignored.
async fn read_csv_upload(mut payload: Multipart, limit: usize) -> Result<String, CatalogError> {
    let mut content: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| CatalogError::InvalidUpload(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| CatalogError::InvalidUpload(e.to_string()))?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if !filename.ends_with(".csv") {
            return Err(CatalogError::InvalidUpload("Only CSV files allowed".to_string()));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| CatalogError::InvalidUpload(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(CatalogError::InvalidUpload(format!(
                    "file exceeds the {} byte limit",
                    limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        content = Some(bytes);
    }

    let bytes = content.ok_or_else(|| CatalogError::InvalidUpload("No file provided".to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| CatalogError::InvalidUpload("file is not valid UTF-8".to_string()))
}
