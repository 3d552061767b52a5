//! # Circuit Image Uploads
//!
//! Writes uploaded images to a fixed directory and records the public path.

pub mod backend;
pub mod errors;
pub mod intake;
pub mod local;

pub use backend::ImageBackend;
pub use errors::{ImageError, ImageResult};
pub use intake::{ImageIntake, StoredImage};
pub use local::LocalBackend;
