use crate::services::{blocking, error_response};
use crate::store::SqliteProductStore;
use actix_web::{web, HttpResponse, Responder};
use catalog_common::requests::PageQuery;

/// `GET /api/products`: one page of products, newest first.
pub(crate) async fn process(
    store: web::Data<SqliteProductStore>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    let PageQuery { page, per_page } = query.into_inner();
    match blocking(move || store.list(page, per_page)).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(&e),
    }
}
