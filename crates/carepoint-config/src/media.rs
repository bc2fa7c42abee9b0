use std::time::Duration;

use crate::{env_lookup, parse_or};

/// Cloudinary account used for doctor avatars.
#[derive(Clone, Debug, Default)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_timeout: Duration,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            cloud_name: lookup("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            api_key: lookup("CLOUDINARY_API_KEY").unwrap_or_default(),
            api_secret: lookup("CLOUDINARY_API_SECRET").unwrap_or_default(),
            upload_timeout: Duration::from_secs(parse_or(&lookup, "MEDIA_UPLOAD_TIMEOUT_SECS", 30)),
        };

        if !config.is_configured() {
            tracing::warn!("Cloudinary credentials are incomplete; doctor avatar uploads will fail");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
