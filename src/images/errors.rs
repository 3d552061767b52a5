//! # Image Intake Errors

use thiserror::Error;

/// Result type for image intake operations
pub type ImageResult<T> = Result<T, ImageError>;

/// Image intake errors
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Invalid image name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Image task failed: {0}")]
    Task(String),
}
