//! Product catalog backend: product CRUD, asynchronous bulk CSV ingestion
//! with pollable progress, and best-effort webhook notifications.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod job_controller;
pub mod notifications;
pub mod services;
pub mod store;

pub use app::AppState;
pub use error::CatalogError;
