//! Profile-image upload to an external media host.
//!
//! Only JPEG and PNG payloads are accepted; anything else is rejected before
//! a request is made. A failed upload never touches the caller's form state,
//! the caller decides whether to attach the returned [`ImageRef`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::{
    domain::ImageRef,
    error::{ErrorCode, ErrorReport},
};
use thiserror::Error;

mod http;

pub use http::{HttpImageUploader, UploadConfig};

pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported image type '{0}'; upload a jpg or png file")]
    UnsupportedType(String),
    #[error("failed to read image '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid upload endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("image upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("image host rejected the upload ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("image host response did not include an image url")]
    MissingUrl,
}

impl From<UploadError> for ErrorReport {
    fn from(value: UploadError) -> Self {
        ErrorReport::new(ErrorCode::Upload, value.to_string())
    }
}

pub fn ensure_supported(mime_type: &str) -> Result<(), UploadError> {
    let normalized = mime_type.trim().to_ascii_lowercase();
    if ALLOWED_IMAGE_TYPES.contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedType(mime_type.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        let mime_type = mime_type.into();
        ensure_supported(&mime_type)?;
        Ok(Self {
            filename: filename.into(),
            mime_type,
            bytes,
        })
    }

    /// Reads an image from disk, guessing its type from the extension.
    /// The type is checked before the file is read.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        ensure_supported(&mime_type)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self {
            filename,
            mime_type,
            bytes,
        })
    }
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Uploads the payload and returns a durable reference to it.
    async fn upload(&self, payload: ImagePayload) -> Result<ImageRef, UploadError>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
