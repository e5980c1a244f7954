// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, services and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use db::{GalleryRepository, GalleryStore};
use dotenv::dotenv;
use services::{
    start_cleanup_task, AssistantModel, AssistantService, GalleryService, GeminiClient,
    ObjectStorage, SupabaseStorage, UploadTracker,
};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", config.log_filter());
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting mountain-view-rv backend...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Upload status tracker, swept every minute
    let tracker = Arc::new(UploadTracker::new(config.upload_status_ttl_secs));
    start_cleanup_task(tracker.clone(), 60);
    log::info!(
        "Initialized upload tracker (TTL: {}s)",
        config.upload_status_ttl_secs
    );

    // 6. External services
    let gemini = config.gemini_enabled().then(|| {
        Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        ))
    });

    let storage: Arc<dyn ObjectStorage> = Arc::new(SupabaseStorage::new(
        config.supabase_url.clone(),
        config.supabase_service_key.clone(),
    ));
    let store: Arc<dyn GalleryStore> = Arc::new(GalleryRepository::new(pool.clone()));

    let mut gallery = GalleryService::new(
        storage,
        store,
        tracker.clone(),
        config.storage_bucket.clone(),
        config.max_upload_bytes,
    )
    .with_fallback_bucket(config.storage_fallback_bucket.clone());

    if let (Some(client), true) = (&gemini, config.vision_categorization) {
        gallery = gallery.with_vision(client.clone());
        log::info!("Vision categorization enabled ({})", config.gemini_model);
    }

    let assistant = AssistantService::new(
        gemini.map(|client| client as Arc<dyn AssistantModel>),
        config.assistant_search_grounding,
        config.chat_requests_per_minute,
    );

    let gallery = web::Data::new(gallery);
    let assistant = web::Data::new(assistant);

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(tracker.clone()))
            .app_data(gallery.clone())
            .app_data(assistant.clone())
            .app_data(web::PayloadConfig::new(config_clone.max_upload_bytes))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::content_config)
            .configure(handlers::gallery_config)
            .configure(handlers::assistant_config)
            .configure(handlers::bookings_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
