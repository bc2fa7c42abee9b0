//! Scriptable [`MediaHost`] for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::host::{AvatarFile, MediaError, MediaFuture, MediaHost, UploadOptions, UploadedAsset};

/// Records every upload and destroy, and can be told to reject uploads.
#[derive(Debug, Default)]
pub struct FakeMediaHost {
    uploads: Mutex<Vec<(AvatarFile, UploadOptions)>>,
    destroyed: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
}

impl FakeMediaHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub async fn upload_count(&self) -> usize {
        self.uploads.lock().await.len()
    }

    pub async fn uploads(&self) -> Vec<(AvatarFile, UploadOptions)> {
        self.uploads.lock().await.clone()
    }

    pub async fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().await.clone()
    }
}

impl MediaHost for FakeMediaHost {
    fn upload(&self, file: AvatarFile, options: UploadOptions) -> MediaFuture<'_, UploadedAsset> {
        Box::pin(async move {
            if self.fail_uploads.load(Ordering::SeqCst) {
                return Err(MediaError::Rejected {
                    status: 500,
                    message: "fake media host is down".to_string(),
                });
            }

            let mut uploads = self.uploads.lock().await;
            let public_id = format!("{}/avatar_{}", options.folder, uploads.len() + 1);
            let secure_url = format!("https://media.test/{public_id}");
            uploads.push((file, options));

            Ok(UploadedAsset {
                public_id,
                secure_url,
            })
        })
    }

    fn destroy<'a>(&'a self, public_id: &'a str) -> MediaFuture<'a, ()> {
        Box::pin(async move {
            self.destroyed.lock().await.push(public_id.to_string());
            Ok(())
        })
    }
}
