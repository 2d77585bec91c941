use crate::services::{blocking, error_response};
use crate::store::{ProductStore, SqliteProductStore};
use actix_web::{web, HttpResponse, Responder};
use log::info;

/// `DELETE /api/products/{id}`.
pub(crate) async fn process(
    store: web::Data<SqliteProductStore>,
    id: web::Path<i64>,
) -> impl Responder {
    let id = id.into_inner();
    match blocking(move || store.delete(id)).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Product deleted" })),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/products/bulk-delete`.
pub(crate) async fn bulk(store: web::Data<SqliteProductStore>) -> impl Responder {
    match blocking(move || store.delete_all()).await {
        Ok(count) => {
            info!("bulk delete removed {} products", count);
            HttpResponse::Ok().json(serde_json::json!({ "message": "All products deleted" }))
        }
        Err(e) => error_response(&e),
    }
}
