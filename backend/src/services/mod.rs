//! HTTP API.
//!
//! - `products`: CRUD over the catalog under `/api/products`.
//! - `uploads`: bulk CSV submission and progress polling under `/api/upload`.
//! - `webhooks`: webhook registrations and test delivery under `/api/webhooks`.

pub mod products;
pub mod uploads;
pub mod webhooks;

use crate::error::CatalogError;
use actix_web::{web, HttpResponse};
use log::error;

/// Runs a store call on the blocking pool instead of the request executor.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, CatalogError>
where
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| CatalogError::Join(e.to_string()))?
}

/// Maps an error to its HTTP status with a `{"error": ...}` body.
pub(crate) fn error_response(err: &CatalogError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    if err.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else if err.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        error!("request failed: {}", err);
        HttpResponse::InternalServerError().json(body)
    }
}
