//! Cross-origin policy for browser clients.

use actix_cors::Cors;

use crate::config::CorsConfig;

/// Build the CORS middleware. Credentials are allowed so browsers may send
/// the `Authorization` header cross-origin.
pub fn cors(config: &CorsConfig) -> Cors {
    let cors = match (&config.allowed_origin, config.locked) {
        (Some(origin), _) => Cors::default().allowed_origin(origin),
        (None, false) => Cors::default().allow_any_origin(),
        // No origin is allowed, so every cross-origin request is refused.
        (None, true) => Cors::default(),
    };

    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
    use actix_web::{App, HttpResponse, test, web};

    use super::*;

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_development_allows_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(cors(&CorsConfig::default()))
                .route("/", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((ORIGIN, "http://localhost:5173"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[actix_web::test]
    async fn test_production_allows_only_the_frontend() {
        let config = CorsConfig {
            allowed_origin: Some("https://reelvault.example".to_string()),
            locked: true,
        };
        let app = test::init_service(
            App::new()
                .wrap(cors(&config))
                .route("/", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((ORIGIN, "https://reelvault.example"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://reelvault.example"
        );

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((ORIGIN, "https://elsewhere.example"))
            .to_request();
        if let Ok(res) = test::try_call_service(&app, req).await {
            assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        }
    }

    #[actix_web::test]
    async fn test_same_origin_requests_pass_when_locked() {
        let config = CorsConfig {
            allowed_origin: None,
            locked: true,
        };
        let app = test::init_service(
            App::new()
                .wrap(cors(&config))
                .route("/", web::get().to(ok)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.status().is_success());
    }
}
