//! # Product Service Module
//!
//! Field-level CRUD over the catalog. Bulk creation goes through
//! `/api/upload` instead.
//!
//! ## Registered routes
//! - `GET /api/products?page=&per_page=`: newest first, defaults 1 and 50.
//! - `POST /api/products`: creates a product; 400 when the SKU exists in any case.
//! - `PUT /api/products/{id}`: overwrites the fields present in the body.
//! - `DELETE /api/products/bulk-delete`: removes every product.
//! - `DELETE /api/products/{id}`: removes one product.

mod delete;
mod get;
mod save;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/products";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::process))
        .route("", post().to(save::create))
        // Registered before `/{id}` so the literal segment wins.
        .route("/bulk-delete", delete().to(delete::bulk))
        .route("/{id}", put().to(save::update))
        .route("/{id}", delete().to(delete::process))
}
