mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::Matcher;
use crate::models::{AdvancedWeights, MatchWeights};
use crate::routes::matches::AppState;
use crate::services::ImageFetcher;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration (defaults apply when no config file exists)
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting shopmatch matching service...");

    // Image fetcher with per-download timeout and URL-keyed cache
    let fetcher = Arc::new(ImageFetcher::new(
        settings.fetch.timeout_secs,
        settings.fetch.cache_capacity,
        settings.fetch.cache_ttl_secs,
    ));

    info!(
        "Image fetcher initialized (timeout: {}s, cache: {} entries, TTL: {}s)",
        settings.fetch.timeout_secs, settings.fetch.cache_capacity, settings.fetch.cache_ttl_secs
    );

    // Matcher with configured weights
    let weights = MatchWeights {
        text: settings.matching.weights.text,
        image: settings.matching.weights.image,
    };
    let advanced_weights = AdvancedWeights {
        text: settings.matching.advanced_weights.text,
        features: settings.matching.advanced_weights.features,
    };

    let matcher = Arc::new(Matcher::new(
        weights,
        advanced_weights,
        settings.matching.concurrency,
        fetcher,
    ));

    info!(
        "Matcher initialized (weights: {:?}, threshold: {}, strategy: {:?})",
        weights, settings.matching.text_threshold, settings.matching.strategy
    );

    // Build application state
    let app_state = AppState {
        matcher,
        text_threshold: settings.matching.text_threshold,
        strategy: settings.matching.strategy,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
