//! Poster upload handler.

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};

use reelvault_core::domain::{MAX_POSTER_BYTES, PosterImage};
use reelvault_shared::dto::UploadResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /upload/image
///
/// The body is the raw image; its `Content-Type` names the format.
pub async fn upload_image(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let Some(uploader) = state.uploader.as_ref() else {
        return Err(AppError::Upstream("image hosting is not configured".to_string()));
    };

    let bytes = match payload.to_bytes_limited(MAX_POSTER_BYTES).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => return Err(AppError::BadRequest(e.to_string())),
        Err(_) => {
            return Err(AppError::Validation(vec![format!(
                "Image exceeds the {MAX_POSTER_BYTES} byte limit"
            )]));
        }
    };

    let image = PosterImage::new(req.content_type(), bytes.to_vec())?;
    let size = image.len();

    let url = uploader.upload(image).await?;
    tracing::info!(user_id = %identity.caller().user_id(), size, "Poster uploaded");

    Ok(HttpResponse::Created().json(UploadResponse { url }))
}
