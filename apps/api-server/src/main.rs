//! # ReelVault API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;


use config::AppConfig;
use middleware::error::{json_error, path_error, query_error};
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

/// Register shared state, extractor error handlers and routes.
fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.clone()))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));

    handlers::configure_routes(cfg, state);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting ReelVault API Server"
    );

    let state = AppState::new(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        std::io::Error::other(e)
    })?;

    let cors = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors::cors(&cors))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_app(cfg, &state))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
