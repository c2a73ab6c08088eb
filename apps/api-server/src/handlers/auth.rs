//! Authentication handlers.

use actix_web::{HttpResponse, web};

use reelvault_core::domain::IdentityClaim;
use reelvault_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.accounts.register(&req.email, &req.password).await?;
    let issued = state.tokens.issue(&IdentityClaim::from(&user))?;

    Ok(HttpResponse::Created().json(AuthResponse::bearer(issued.token, issued.expires_in)))
}

/// POST /auth/login
///
/// Unknown email, wrong password and inactive account all answer the same
/// 401.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let claim = state
        .credentials
        .verify(&req.email, &req.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let issued = state.tokens.issue(&claim)?;
    tracing::info!(user_id = %claim.user_id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(issued.token, issued.expires_in)))
}
