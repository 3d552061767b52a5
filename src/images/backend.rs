//! # Image Backend Trait

use super::errors::ImageResult;

/// Where uploaded image bytes end up.
///
/// Calls block; the intake runs them on the blocking pool.
pub trait ImageBackend: Send + Sync + std::fmt::Debug {
    /// Write data under the given file name
    fn write(&self, name: &str, data: &[u8]) -> ImageResult<()>;

    /// Delete the file with the given name
    fn delete(&self, name: &str) -> ImageResult<()>;
}
