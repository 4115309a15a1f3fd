// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use config::Config;
use db::UserRepository;
use dotenv::dotenv;
use services::{FileHostClient, GoogleIdentityClient};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting campus-restrooms service...");
    log::info!("Environment: {}", config.environment);
    log::info!("Photo storage: {:?}", config.photo_storage);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool (creates tables if missing)
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Promote configured admins that already have an account
    if !config.admin_emails.is_empty() {
        match UserRepository::promote_admins(&pool, &config.admin_emails).await {
            Ok(count) => log::info!("Admin role confirmed for {} existing users", count),
            Err(e) => log::warn!("Could not promote configured admins: {}", e),
        }
    }

    // 6. Outbound clients
    let identity = web::Data::new(GoogleIdentityClient::new(
        config.google_tokeninfo_url.clone(),
        config.google_client_id.clone(),
    ));
    let file_host = match FileHostClient::new(&config) {
        Ok(client) => web::Data::new(client),
        Err(e) => {
            log::error!("Failed to build file host client: {}", e);
            std::process::exit(1);
        }
    };

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();
    let app_pool = pool.clone();

    let result = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::ORIGIN,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
                header::HeaderName::from_static("x-user-email"),
            ])
            .expose_headers(vec![header::CONTENT_LENGTH, header::CONTENT_TYPE])
            .max_age(86400);

        App::new()
            // Application state
            .app_data(web::Data::new(app_pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(identity.clone())
            .app_data(file_host.clone())
            .app_data(handlers::json_config(config_clone.max_body_bytes))
            // Middleware
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::restrooms_config)
            .configure(handlers::reviews_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await;

    log::info!("Server stopped, closing database pool");
    config::close_db_pool(pool).await;

    result
}
