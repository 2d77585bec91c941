use actix_web::{App, HttpServer};
use catalog_backend::config::AppConfig;
use catalog_backend::db::Database;
use catalog_backend::notifications::{start_notification_dispatcher, ChannelNotifier};
use catalog_backend::AppState;
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(startup_error)?;
    let db = Database::open(&config.database_path).map_err(startup_error)?;
    info!("Using database {}", config.database_path);

    // Batch notifications flow through one channel to one dispatcher task.
    let (tx, rx) = mpsc::unbounded_channel();
    let state = AppState::new(db, &config, Arc::new(ChannelNotifier::new(tx)))
        .map_err(startup_error)?;

    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        start_notification_dispatcher(dispatcher, rx).await;
    });

    let url = format!("http://{}:{}", config.host, config.port);
    info!("Server running at {}", url);

    HttpServer::new(move || App::new().configure(|cfg| state.configure(cfg)))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
