use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Content types accepted for doctor avatars.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

pub fn is_supported_image(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(content_type.trim()))
}

pub type MediaFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MediaError>> + Send + 'a>>;

/// An uploaded file part, fully buffered.
#[derive(Debug, Clone)]
pub struct AvatarFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Placement and transformation requested from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub folder: String,
    pub width: u32,
    pub crop: String,
}

impl UploadOptions {
    pub fn doctor_avatar() -> Self {
        Self {
            folder: "doctor_avatars".to_string(),
            width: 500,
            crop: "scale".to_string(),
        }
    }
}

/// Where the host put the file. `public_id` is needed to delete it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub public_id: String,
    pub secure_url: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host credentials are not configured")]
    NotConfigured,

    #[error("media host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("media host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("media host returned an unexpected response: {0}")]
    InvalidResponse(String),
}

/// External image host. Object-safe so it can live in application state as
/// `Arc<dyn MediaHost>`.
pub trait MediaHost: Send + Sync {
    fn upload(&self, file: AvatarFile, options: UploadOptions) -> MediaFuture<'_, UploadedAsset>;

    /// Removes a previously uploaded asset. Removing an unknown asset is not
    /// an error.
    fn destroy<'a>(&'a self, public_id: &'a str) -> MediaFuture<'a, ()>;
}
