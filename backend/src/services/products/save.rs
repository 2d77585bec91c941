use crate::error::CatalogError;
use crate::services::{blocking, error_response};
use crate::store::{ProductPatch, SqliteProductStore};
use actix_web::{web, HttpResponse, Responder};
use catalog_common::model::product::ProductInput;
use catalog_common::requests::{CreateProductRequest, UpdateProductRequest};

/// `POST /api/products`.
///
/// The SKU is trimmed and lowercased like ingested keys. Returns `201` with
/// the new id, or `400` when the SKU is blank or already taken.
pub(crate) async fn create(
    store: web::Data<SqliteProductStore>,
    payload: web::Json<CreateProductRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let Some(mut input) = ProductInput::new(&req.sku, req.name, req.description, req.price) else {
        return error_response(&CatalogError::Validation("sku must not be empty".to_string()));
    };
    input.active = req.active;

    match blocking(move || store.create(&input)).await {
        Ok(product) => HttpResponse::Created().json(serde_json::json!({
            "id": product.id,
            "message": "Product created",
        })),
        Err(e) => error_response(&e),
    }
}

/// `PUT /api/products/{id}`: fields absent from the body keep their value.
pub(crate) async fn update(
    store: web::Data<SqliteProductStore>,
    id: web::Path<i64>,
    payload: web::Json<UpdateProductRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let patch = ProductPatch {
        name: req.name,
        description: req.description,
        price: req.price,
        active: req.active,
    };
    let id = id.into_inner();
    match blocking(move || store.update(id, patch)).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "message": "Product updated" })),
        Err(e) => error_response(&e),
    }
}
