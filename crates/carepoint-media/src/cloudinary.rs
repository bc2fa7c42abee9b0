//! Cloudinary client using signed uploads.
//!
//! Requests are signed with SHA-256: the signed parameters are sorted by
//! name, joined as `key=value` pairs with `&`, suffixed with the API secret
//! and hashed. `api_key`, `file` and `signature_algorithm` are never signed.

use std::sync::Arc;

use carepoint_config::MediaConfig;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::host::{AvatarFile, MediaError, MediaFuture, MediaHost, UploadOptions, UploadedAsset};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Builds the string Cloudinary expects to be hashed, before the secret is
/// appended.
fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Clone)]
pub struct CloudinaryMediaHost {
    client: reqwest::Client,
    config: Arc<MediaConfig>,
    api_base: String,
}

impl std::fmt::Debug for CloudinaryMediaHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryMediaHost")
            .field("cloud_name", &self.config.cloud_name)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl CloudinaryMediaHost {
    /// Builds a client whose every request gives up after
    /// `config.upload_timeout`.
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(config.upload_timeout)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config.clone()),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Points the client at another API root, e.g. a local mock server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            action
        )
    }

    fn ensure_configured(&self) -> Result<(), MediaError> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(MediaError::NotConfigured)
        }
    }

    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = sign(&params, &self.config.api_secret);

        let mut form = Form::new();
        for (key, value) in params {
            form = form.text(key, value);
        }

        form.text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn send(&self, action: &str, form: Form) -> Result<reqwest::Response, MediaError> {
        let response = self
            .client
            .post(self.endpoint(action))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);

        Err(MediaError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl MediaHost for CloudinaryMediaHost {
    fn upload(&self, file: AvatarFile, options: UploadOptions) -> MediaFuture<'_, UploadedAsset> {
        Box::pin(async move {
            self.ensure_configured()?;

            let params = vec![
                ("folder", options.folder),
                ("timestamp", Utc::now().timestamp().to_string()),
                (
                    "transformation",
                    format!("c_{},w_{}", options.crop, options.width),
                ),
            ];

            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            let form = self.signed_form(params).part("file", part);

            let uploaded: UploadResponse = self.send("upload", form).await?.json().await?;

            if uploaded.public_id.is_empty() || uploaded.secure_url.is_empty() {
                return Err(MediaError::InvalidResponse(
                    "upload response is missing public_id or secure_url".to_string(),
                ));
            }

            tracing::debug!(public_id = %uploaded.public_id, "Avatar uploaded");

            Ok(UploadedAsset {
                public_id: uploaded.public_id,
                secure_url: uploaded.secure_url,
            })
        })
    }

    fn destroy<'a>(&'a self, public_id: &'a str) -> MediaFuture<'a, ()> {
        Box::pin(async move {
            self.ensure_configured()?;

            let params = vec![
                ("public_id", public_id.to_string()),
                ("timestamp", Utc::now().timestamp().to_string()),
            ];

            let destroyed: DestroyResponse =
                self.send("destroy", self.signed_form(params)).await?.json().await?;

            match destroyed.result.as_str() {
                "ok" | "not found" => Ok(()),
                other => Err(MediaError::InvalidResponse(format!(
                    "unexpected destroy result '{other}'"
                ))),
            }
        })
    }
}
