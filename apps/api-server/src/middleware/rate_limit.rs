//! Rate limiting middleware, keyed by client IP.
//!
//! The key is the socket peer address. `X-Forwarded-For` and `Forwarded`
//! are only honoured when the server is told it sits behind a proxy, since
//! clients can set those headers to anything.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use reelvault_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use reelvault_core::ports::RateLimiter;

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    trust_forwarded: bool,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            trust_forwarded: false,
        }
    }

    /// Key on the forwarded client address instead of the peer.
    pub fn trust_forwarded(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }
}

const REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

fn client_key(req: &ServiceRequest, trust_forwarded: bool) -> String {
    let addr = if trust_forwarded {
        req.connection_info().realip_remote_addr().map(str::to_owned)
    } else {
        req.peer_addr().map(|addr| addr.ip().to_string())
    };
    addr.unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trust_forwarded: self.trust_forwarded,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    trust_forwarded: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        let key = client_key(&req, self.trust_forwarded);

        Box::pin(async move {
            let remaining = match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    let retry_after = result.reset_after.as_secs().max(1);
                    tracing::warn!(client = %key, retry_after, "Rate limit exceeded");

                    let error = ErrorResponse::too_many_requests().with_detail(format!(
                        "Rate limit exceeded. Try again in {retry_after} seconds."
                    ));
                    let response = HttpResponse::TooManyRequests()
                        .insert_header((REMAINING, "0"))
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(error);

                    return Ok(req.into_response(response).map_into_right_body());
                }
                Ok(result) => Some(result.remaining),
                Err(e) => {
                    tracing::error!(error = %e, "Rate limiter error, failing open");
                    None
                }
            };

            let mut res = service.call(req).await?;
            if let Some(remaining) = remaining {
                res.headers_mut().insert(REMAINING, HeaderValue::from(remaining));
            }
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use actix_web::{App, HttpResponse, http::StatusCode, test, web};
    use async_trait::async_trait;
    use reelvault_core::ports::{RateLimitError, RateLimitResult};
    use reelvault_infra::{InMemoryRateLimiter, RateLimitConfig};

    use super::*;

    struct BrokenLimiter;

    #[async_trait]
    impl RateLimiter for BrokenLimiter {
        async fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
            Err(RateLimitError::Backend("unavailable".to_string()))
        }
    }

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn one_per_minute() -> Arc<InMemoryRateLimiter> {
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        }))
    }

    fn from_peer(forwarded_for: &str) -> test::TestRequest {
        let peer: SocketAddr = "203.0.113.7:40000".parse().unwrap();
        test::TestRequest::get()
            .uri("/")
            .peer_addr(peer)
            .insert_header(("X-Forwarded-For", forwarded_for))
    }

    #[actix_web::test]
    async fn test_rejects_after_limit() {
        let limiter = one_per_minute();
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter))
                .route("/", web::get().to(ok)),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers().get("x-ratelimit-remaining").unwrap(), "0");

        let second = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key("retry-after"));
    }

    #[actix_web::test]
    async fn test_spoofed_forwarded_for_shares_the_peer_budget() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(one_per_minute()))
                .route("/", web::get().to(ok)),
        )
        .await;

        let first = test::call_service(&app, from_peer("198.51.100.1").to_request()).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = test::call_service(&app, from_peer("198.51.100.2").to_request()).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_trusted_proxy_keys_on_forwarded_client() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(one_per_minute()).trust_forwarded(true))
                .route("/", web::get().to(ok)),
        )
        .await;

        for client in ["198.51.100.1", "198.51.100.2"] {
            let res = test::call_service(&app, from_peer(client).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{client}");
        }

        let repeat = test::call_service(&app, from_peer("198.51.100.1").to_request()).await;
        assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_fails_open() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(Arc::new(BrokenLimiter)))
                .route("/", web::get().to(ok)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
