//! Cloudinary unsigned uploads.
//!
//! Posters are posted to the upload endpoint with an unsigned upload preset.
//! Resizing and quality settings belong to the preset, not to this client:
//! configure it with the incoming transformation `c_fill,w_500,h_750,q_auto`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use uuid::Uuid;

use reelvault_core::domain::PosterImage;
use reelvault_core::ports::{ImageUploader, UploadError};

/// Cloudinary account settings.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub folder: String,
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Read `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_UPLOAD_PRESET` and
    /// `CLOUDINARY_FOLDER`. Returns `None` unless both the cloud name and
    /// preset are set.
    pub fn from_env() -> Option<Self> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").ok()?;
        let upload_preset = std::env::var("CLOUDINARY_UPLOAD_PRESET").ok()?;

        Some(Self {
            cloud_name,
            upload_preset,
            folder: std::env::var("CLOUDINARY_FOLDER")
                .unwrap_or_else(|_| "movie-posters".to_string()),
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// `ImageUploader` backed by Cloudinary.
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }
}

fn public_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("poster-{}-{}", Utc::now().timestamp_millis(), &suffix[..10])
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, image: PosterImage) -> Result<String, UploadError> {
        let public_id = public_id();
        let content_type = image.content_type().to_string();
        let size = image.len();

        let file = Part::bytes(image.into_bytes())
            .file_name(public_id.clone())
            .mime_str(&content_type)
            .map_err(|e| UploadError::Rejected(e.to_string()))?;

        let form = Form::new()
            .part("file", file)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", self.config.folder.clone())
            .text("public_id", public_id.clone());

        tracing::debug!(%public_id, size, "Uploading poster");

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected(format!("{status}: {body}")));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Decode(e.to_string()))?;

        tracing::info!(%public_id, "Poster uploaded");
        Ok(body.secure_url)
    }
}
