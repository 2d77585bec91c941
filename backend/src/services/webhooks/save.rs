use crate::error::CatalogError;
use crate::notifications::{SqliteWebhookRegistry, WebhookPatch};
use crate::services::{blocking, error_response};
use actix_web::{web, HttpResponse, Responder};
use catalog_common::requests::{CreateWebhookRequest, UpdateWebhookRequest};

pub(crate) async fn list(registry: web::Data<SqliteWebhookRegistry>) -> impl Responder {
    match blocking(move || registry.list()).await {
        Ok(webhooks) => HttpResponse::Ok().json(webhooks),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn create(
    registry: web::Data<SqliteWebhookRegistry>,
    payload: web::Json<CreateWebhookRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let url = req.url.trim().to_string();
    let event_type = req.event_type.trim().to_string();
    if url.is_empty() || event_type.is_empty() {
        return error_response(&CatalogError::Validation(
            "url and event_type are required".to_string(),
        ));
    }
    match blocking(move || registry.create(&url, &event_type, req.enabled)).await {
        Ok(webhook) => HttpResponse::Created().json(serde_json::json!({
            "id": webhook.id,
            "message": "Webhook created",
        })),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn update(
    registry: web::Data<SqliteWebhookRegistry>,
    id: web::Path<i64>,
    payload: web::Json<UpdateWebhookRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let patch = WebhookPatch {
        url: req.url,
        event_type: req.event_type,
        enabled: req.enabled,
    };
    let id = id.into_inner();
    match blocking(move || registry.update(id, patch)).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "message": "Webhook updated" })),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn delete(
    registry: web::Data<SqliteWebhookRegistry>,
    id: web::Path<i64>,
) -> impl Responder {
    let id = id.into_inner();
    match blocking(move || registry.delete(id)).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Webhook deleted" })),
        Err(e) => error_response(&e),
    }
}
