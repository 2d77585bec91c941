//! # Webhook Service Module
//!
//! Registrations consumed by the notification dispatcher.
//!
//! ## Registered routes
//! - `GET /api/webhooks`, `POST /api/webhooks`
//! - `PUT /api/webhooks/{id}`, `DELETE /api/webhooks/{id}`
//! - `POST /api/webhooks/{id}/test`: one synchronous delivery of
//!   `{"test": true}`, reporting status code and response time.

mod save;
mod test_delivery;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/webhooks";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(save::list))
        .route("", post().to(save::create))
        .route("/{id}", put().to(save::update))
        .route("/{id}", delete().to(save::delete))
        .route("/{id}/test", post().to(test_delivery::process))
}
