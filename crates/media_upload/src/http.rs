use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use shared::domain::ImageRef;
use tracing::{info, warn};
use url::Url;

use crate::{ensure_supported, ImagePayload, ImageUploader, UploadError};

/// Unsigned-upload settings for a Cloudinary-style media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    error: Option<UploadResponseError>,
}

#[derive(Debug, Deserialize)]
struct UploadResponseError {
    message: String,
}

/// Posts `file` and `upload_preset` as multipart form data to
/// `{base_url}/v1_1/{cloud_name}/image/upload`.
#[derive(Debug, Clone)]
pub struct HttpImageUploader {
    http: Client,
    endpoint: Url,
    upload_preset: String,
}

impl HttpImageUploader {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)?.join(&format!(
            "v1_1/{}/image/upload",
            config.cloud_name.trim()
        ))?;
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            endpoint,
            upload_preset: config.upload_preset.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ImageUploader for HttpImageUploader {
    async fn upload(&self, payload: ImagePayload) -> Result<ImageRef, UploadError> {
        ensure_supported(&payload.mime_type)?;

        let filename = payload.filename.clone();
        let size_bytes = payload.bytes.len();
        let part = Part::bytes(payload.bytes)
            .file_name(payload.filename)
            .mime_str(&payload.mime_type)?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<UploadResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|error| error.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("upload failed")
                        .to_string()
                });
            warn!(%filename, status = status.as_u16(), %message, "image upload rejected");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response.json().await?;
        let Some(url) = body.secure_url else {
            warn!(%filename, "image upload response carried no secure_url");
            return Err(UploadError::MissingUrl);
        };

        info!(%filename, size_bytes, %url, "image uploaded");
        Ok(ImageRef {
            url,
            public_id: body.public_id.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
