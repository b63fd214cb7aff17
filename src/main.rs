mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use handlers::health::not_found;
use models::T5Paraphraser;
use routes::api;
use services::ParaphraseService;

#[derive(Clone)]
pub struct AppState {
    pub paraphrase_service: ParaphraseService,
    pub config: Config,
    pub start_time: Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Starting paraphrase service on port {}",
        config.server.port
    );

    // The model is loaded once, before the server accepts traffic
    let paraphraser = match T5Paraphraser::load(config.model.clone()).await {
        Ok(model) => Arc::new(model),
        Err(e) => {
            error!("Failed to load paraphrase model: {:#}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        paraphrase_service: ParaphraseService::new(
            paraphraser,
            config.model.max_pending_generations,
        ),
        config: config.clone(),
        start_time: Instant::now(),
    };

    // Create HTTP server
    let server = HttpServer::new(move || {
        let cors = cors_policy(&state.config.security.allowed_origins);
        let max_json_payload_size = state.config.server.max_json_payload_size;

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(|cfg| api::config(cfg, max_json_payload_size))
            .default_service(web::route().to(not_found))
    })
    .bind(format!("{}:{}", config.server.host, config.server.port))?;

    info!(
        "Server started successfully at http://{}:{}",
        config.server.host, config.server.port
    );

    // Run the server
    server.workers(config.server.workers).run().await
}

fn cors_policy(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
