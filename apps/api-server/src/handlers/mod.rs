//! HTTP handlers and route configuration.

mod auth;
mod health;
mod movies;
mod upload;

use actix_web::web;

use crate::middleware::auth::RequireAuth;
#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let auth_routes = web::scope("/auth")
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login));

    #[cfg(feature = "rate-limit")]
    let auth_routes = auth_routes.wrap(
        RateLimitMiddleware::new(state.login_limiter.clone()).trust_forwarded(state.trust_proxy),
    );

    cfg.route("/health", web::get().to(health::health_check))
        .service(auth_routes)
        .service(
            web::scope("/movies")
                .wrap(RequireAuth::new(state.tokens.clone()))
                .route("", web::post().to(movies::create))
                .route("", web::get().to(movies::list))
                .route("/{id}", web::get().to(movies::get))
                .route("/{id}", web::patch().to(movies::update))
                .route("/{id}", web::delete().to(movies::remove)),
        )
        .service(
            web::scope("/upload")
                .wrap(RequireAuth::new(state.tokens.clone()))
                .route("/image", web::post().to(upload::upload_image)),
        );
}
