use crate::error::CatalogError;
use crate::job_controller::state::JobsState;
use crate::services::{blocking, error_response};
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(upload_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    let upload_id = upload_id.into_inner();
    let progress = state.progress.clone();
    let job_id = upload_id.clone();
    match blocking(move || progress.get(&job_id)).await {
        Ok(Some(progress)) => HttpResponse::Ok().json(progress.report()),
        Ok(None) => error_response(&CatalogError::JobNotFound(upload_id)),
        Err(e) => error_response(&e),
    }
}
