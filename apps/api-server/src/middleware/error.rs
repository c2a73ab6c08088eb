//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use reelvault_core::error::{DomainError, RepoError};
use reelvault_core::ports::{AuthError, UploadError};
use reelvault_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Every authentication failure renders the same body.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation errors: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Upstream(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors),
            AppError::Upstream(detail) => {
                tracing::warn!(error = %detail, "Upstream call failed");
                ErrorResponse::bad_request("Image upload failed")
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{entity_type} with id {id} not found"))
            }
            DomainError::Validation(messages) => AppError::Validation(messages),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Repo(e) => e.into(),
            DomainError::Auth(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                AppError::Internal(format!("Database error: {msg}"))
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            e @ (AuthError::HashingError(_) | AuthError::Signing(_)) => {
                AppError::Internal(e.to_string())
            }
            _ => AppError::Unauthorized,
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Extractor error handlers so malformed input renders as problem details.
pub fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

pub fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

pub fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use uuid::Uuid;

    use super::*;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (
                AppError::from(DomainError::NotFound {
                    entity_type: "Movie",
                    id: Uuid::nil(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(DomainError::validation("title should not be empty")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(DomainError::Duplicate("taken".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(UploadError::Transport("host down".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(DomainError::Repo(RepoError::Query("boom".to_string()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }

    #[test]
    fn test_token_failures_collapse_to_unauthorized() {
        for err in [
            AuthError::MissingAuth,
            AuthError::TokenExpired,
            AuthError::MalformedToken("segments".to_string()),
            AuthError::InvalidToken("signature".to_string()),
        ] {
            assert!(matches!(AppError::from(err), AppError::Unauthorized));
        }
        assert!(matches!(
            AppError::from(AuthError::HashingError("oom".to_string())),
            AppError::Internal(_)
        ));
    }

    #[actix_web::test]
    async fn test_internal_detail_is_not_leaked() {
        let body = body_of(AppError::Internal("password=hunter2".to_string())).await;
        assert_eq!(body["status"], 500);
        assert!(body.get("detail").is_none());
    }

    #[actix_web::test]
    async fn test_upstream_detail_is_generic() {
        let body = body_of(AppError::Upstream("401: bad api key".to_string())).await;
        assert_eq!(body["detail"], "Image upload failed");
    }
}
