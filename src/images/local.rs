//! # Local Filesystem Backend

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::backend::ImageBackend;
use super::errors::{ImageError, ImageResult};

/// Flat directory of uploaded images
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, name: &str) -> ImageResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ImageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl ImageBackend for LocalBackend {
    fn write(&self, name: &str, data: &[u8]) -> ImageResult<()> {
        let full_path = self.full_path(name)?;

        fs::create_dir_all(&self.root).map_err(|e| ImageError::IoError(e.to_string()))?;
        fs::write(&full_path, data).map_err(|e| ImageError::IoError(e.to_string()))
    }

    fn delete(&self, name: &str) -> ImageResult<()> {
        let full_path = self.full_path(name)?;

        fs::remove_file(&full_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ImageError::NotFound(name.to_string())
            } else {
                ImageError::IoError(e.to_string())
            }
        })
    }
}
