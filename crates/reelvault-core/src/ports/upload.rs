//! Image hosting port.

use async_trait::async_trait;

use crate::domain::PosterImage;

/// Hands a poster to an image host and returns where it lives.
///
/// The returned URL is stored on a movie as an opaque string.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, image: PosterImage) -> Result<String, UploadError>;
}

/// Image upload errors. None of these reach the client verbatim.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload rejected by host: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected host response: {0}")]
    Decode(String),
}
