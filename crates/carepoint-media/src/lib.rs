//! # CarePoint Media
//!
//! Upload and removal of doctor avatars on an external media host.
//!
//! - [`host`]: the [`MediaHost`] trait and its value types
//! - [`cloudinary`]: [`CloudinaryMediaHost`], a signed-upload client
//! - `fake`: `FakeMediaHost`, available with the `test-utils` feature
//!
//! # Example
//!
//! ```ignore
//! use carepoint_config::MediaConfig;
//! use carepoint_media::{AvatarFile, CloudinaryMediaHost, MediaHost, UploadOptions};
//!
//! let host = CloudinaryMediaHost::new(&MediaConfig::from_env())?;
//! let asset = host.upload(file, UploadOptions::doctor_avatar()).await?;
//! host.destroy(&asset.public_id).await?;
//! ```

pub mod cloudinary;
#[cfg(any(test, feature = "test-utils"))]
pub mod fake;
pub mod host;

pub use cloudinary::CloudinaryMediaHost;
#[cfg(any(test, feature = "test-utils"))]
pub use fake::FakeMediaHost;
pub use host::{
    ALLOWED_IMAGE_TYPES, AvatarFile, MediaError, MediaFuture, MediaHost, UploadOptions,
    UploadedAsset, is_supported_image,
};
