//! Wiring of stores, worker, scheduler and dispatcher into one application
//! state shared by `main` and the HTTP tests.

use crate::config::AppConfig;
use crate::db::Database;
use crate::ingest::IngestionWorker;
use crate::job_controller::progress::SqliteProgressTracker;
use crate::job_controller::state::JobsState;
use crate::notifications::{Notifier, SqliteWebhookRegistry, WebhookDispatcher, WebhookError};
use crate::services;
use crate::store::SqliteProductStore;
use actix_web::web;
use std::sync::Arc;

/// Largest accepted JSON request body, 10 MB.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub products: SqliteProductStore,
    pub webhooks: SqliteWebhookRegistry,
    pub dispatcher: Arc<WebhookDispatcher>,
    pub jobs: JobsState,
    pub upload_limit_bytes: usize,
}

impl AppState {
    /// Builds every component over `db`. Batch notifications go to `notifier`.
    pub fn new(
        db: Database,
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, WebhookError> {
        let products = SqliteProductStore::new(db.clone());
        let progress = Arc::new(SqliteProgressTracker::new(db.clone()));
        let webhooks = SqliteWebhookRegistry::new(db);
        let dispatcher = Arc::new(WebhookDispatcher::new(
            Arc::new(webhooks.clone()),
            config.webhook_timeout,
        )?);

        let worker = IngestionWorker::new(Arc::new(products.clone()), progress.clone(), notifier)
            .with_batch_size(config.batch_size);
        let jobs = JobsState::new(progress, Arc::new(worker));

        Ok(Self {
            products,
            webhooks,
            dispatcher,
            jobs,
            upload_limit_bytes: config.upload_limit_bytes,
        })
    }

    /// Registers the application data and every API scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .app_data(web::Data::new(self.products.clone()))
            .app_data(web::Data::new(self.webhooks.clone()))
            .app_data(web::Data::from(self.dispatcher.clone()))
            .app_data(web::Data::new(self.jobs.clone()))
            .app_data(web::Data::new(services::uploads::UploadLimit(
                self.upload_limit_bytes,
            )))
            .service(services::products::configure_routes())
            .service(services::uploads::configure_routes())
            .service(services::webhooks::configure_routes());
    }
}
