use crate::notifications::{SqliteWebhookRegistry, WebhookDispatcher};
use crate::services::{blocking, error_response};
use actix_web::{web, HttpResponse, Responder};

/// `POST /api/webhooks/{id}/test`.
///
/// `200` with `{success: true, status_code, response_time}` when the endpoint
/// answered, `500` with `{success: false, error}` when it could not be reached.
pub(crate) async fn process(
    registry: web::Data<SqliteWebhookRegistry>,
    dispatcher: web::Data<WebhookDispatcher>,
    id: web::Path<i64>,
) -> impl Responder {
    let id = id.into_inner();
    let webhook = match blocking(move || registry.get(id)).await {
        Ok(webhook) => webhook,
        Err(e) => return error_response(&e),
    };
    let report = dispatcher.test_delivery(&webhook).await;
    if report.success {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::InternalServerError().json(report)
    }
}
