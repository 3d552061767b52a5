//! # Circuit Domain
//!
//! The circuit record, its slug derivation, and write validation.

pub mod model;
pub mod seed;
pub mod slug;
pub mod validator;

pub use model::{Circuit, CircuitFields, CircuitId, DEFAULT_IMAGE_PATH};
pub use seed::reference_circuits;
pub use slug::slugify;
pub use validator::{CircuitValidator, ValidationError, ValidationResult};
