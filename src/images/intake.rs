//! # Image Intake
//!
//! Stores uploaded circuit images and hands back the public path recorded on
//! the circuit. Backend calls run on Tokio's blocking pool so a large upload
//! only holds up its own request.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::backend::ImageBackend;
use super::errors::{ImageError, ImageResult};

/// An image written by the intake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// File name inside the upload directory
    pub file_name: String,
    /// Path under which the static server exposes the file
    pub public_path: String,
}

/// Upload intake for circuit images
#[derive(Debug, Clone)]
pub struct ImageIntake {
    backend: Arc<dyn ImageBackend>,
    url_prefix: String,
}

impl ImageIntake {
    /// Create an intake writing through `backend` and publishing under `url_prefix`
    pub fn new(backend: impl ImageBackend + 'static, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        Self {
            backend: Arc::new(backend),
            url_prefix,
        }
    }

    /// Write an uploaded image under a fresh unique name
    pub async fn save<D>(&self, original_name: Option<&str>, data: D) -> ImageResult<StoredImage>
    where
        D: AsRef<[u8]> + Send + 'static,
    {
        let file_name = format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name.unwrap_or_default())
        );
        let size = data.as_ref().len();

        let name = file_name.clone();
        self.run(move |backend| backend.write(&name, data.as_ref()))
            .await?;

        let public_path = format!("{}/{}", self.url_prefix, file_name);
        debug!(path = %public_path, size, "stored circuit image");
        Ok(StoredImage {
            file_name,
            public_path,
        })
    }

    /// Remove a previously stored image
    pub async fn discard(&self, image: &StoredImage) -> ImageResult<()> {
        let name = image.file_name.clone();
        self.run(move |backend| backend.delete(&name)).await
    }

    async fn run<T, F>(&self, op: F) -> ImageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ImageBackend) -> ImageResult<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || op(backend.as_ref()))
            .await
            .map_err(|e| ImageError::Task(e.to_string()))?
    }
}

/// Last path component with anything outside `[A-Za-z0-9._-]` replaced
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}
