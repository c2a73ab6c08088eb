//! Authentication middleware and extractors.
//!
//! `RequireAuth` guards a scope: it validates the bearer token before any
//! handler runs and leaves a `Caller` in the request extensions. Handlers
//! read it back with the `Identity` extractor.

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use reelvault_core::domain::Caller;
use reelvault_core::ports::{AuthError, TokenService};

use crate::middleware::error::AppError;

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn authenticate(req: &ServiceRequest, tokens: &dyn TokenService) -> Result<Caller, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::MalformedToken("non-ASCII authorization header".to_string()))?;

    let token = bearer_token(value)
        .ok_or_else(|| AuthError::MalformedToken("expected a Bearer token".to_string()))?;

    tokens.validate(token).map(Caller::from)
}

/// Middleware factory that rejects requests without a valid bearer token.
pub struct RequireAuth {
    tokens: Arc<dyn TokenService>,
}

impl RequireAuth {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: S,
    tokens: Arc<dyn TokenService>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req, self.tokens.as_ref()) {
            Ok(caller) => {
                req.extensions_mut().insert(caller);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(reason) => {
                tracing::debug!(%reason, path = %req.path(), "Rejected unauthenticated request");

                let response = AppError::Unauthorized.error_response();
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

/// The authenticated caller of the current request.
///
/// Only available on routes wrapped in `RequireAuth`.
#[derive(Debug, Clone, Copy)]
pub struct Identity(Caller);

impl Identity {
    pub fn caller(&self) -> &Caller {
        &self.0
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let caller = req.extensions().get::<Caller>().copied();
        ready(caller.map(Identity).ok_or(AppError::Unauthorized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
    }

    #[test]
    fn test_non_bearer_values_rejected() {
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
