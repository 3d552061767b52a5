//! # Circuit Model
//!
//! The circuit record as stored and as sent over the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slug::slugify;

/// Image path recorded when a circuit is created without an image
pub const DEFAULT_IMAGE_PATH: &str = "/images/default-circuit.jpg";

/// Store-assigned circuit identifier.
///
/// The in-memory store hands out sequential integers, the document store opaque
/// keys. Both serialize as plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CircuitId {
    /// Sequential id
    Seq(u64),
    /// Opaque document key
    Key(String),
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitId::Seq(n) => write!(f, "{}", n),
            CircuitId::Key(k) => write!(f, "{}", k),
        }
    }
}

/// Validated, client-writable circuit fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitFields {
    pub name: String,
    pub location: String,
    pub length_km: f64,
    pub laps: u32,
    pub drs_zones: u32,
    pub opened: i32,
}

/// A stored circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: CircuitId,
    pub name: String,
    pub slug: String,
    pub location: String,
    pub image_path: String,
    pub length_km: f64,
    pub laps: u32,
    pub drs_zones: u32,
    pub opened: i32,
}

impl Circuit {
    /// Build a new record from validated fields.
    ///
    /// The slug is derived from the name; the image falls back to
    /// [`DEFAULT_IMAGE_PATH`].
    pub fn create(id: CircuitId, fields: CircuitFields, image_path: Option<String>) -> Self {
        Self {
            id,
            slug: slugify(&fields.name),
            name: fields.name,
            location: fields.location,
            image_path: image_path.unwrap_or_else(|| DEFAULT_IMAGE_PATH.to_string()),
            length_km: fields.length_km,
            laps: fields.laps,
            drs_zones: fields.drs_zones,
            opened: fields.opened,
        }
    }

    /// Overwrite every writable field and re-derive the slug.
    ///
    /// The image is only replaced when a new one is supplied.
    pub fn apply(&mut self, fields: CircuitFields, image_path: Option<String>) {
        self.slug = slugify(&fields.name);
        self.name = fields.name;
        self.location = fields.location;
        self.length_km = fields.length_km;
        self.laps = fields.laps;
        self.drs_zones = fields.drs_zones;
        self.opened = fields.opened;
        if let Some(path) = image_path {
            self.image_path = path;
        }
    }
}
