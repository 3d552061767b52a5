//! # Circuit Validator
//!
//! Checks a candidate body against the circuit field constraints and yields the
//! typed fields. Only the first violation is reported, in field order
//! `name`, `location`, `length_km`, `laps`, `drs_zones`, `opened`.

use chrono::{Datelike, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use super::model::CircuitFields;

const MIN_TEXT_LEN: usize = 3;
const MIN_LENGTH_KM: f64 = 0.1;
const MIN_LAPS: i64 = 1;
const MIN_DRS_ZONES: i64 = 0;
const FIRST_OPENED_YEAR: i64 = 1900;
const MAX_COUNT: i64 = u32::MAX as i64;

/// A failed validation, carrying the human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn required(field: &str) -> Self {
        Self::new(format!("\"{}\" is required", field))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Field validator for circuit writes
#[derive(Debug, Clone, Copy)]
pub struct CircuitValidator {
    current_year: i32,
}

impl Default for CircuitValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitValidator {
    /// Validator whose upper bound for `opened` is this calendar year (UTC)
    pub fn new() -> Self {
        Self::for_year(Utc::now().year())
    }

    /// Validator with a fixed upper bound for `opened`
    pub fn for_year(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Validate a candidate body.
    ///
    /// Keys other than the six writable fields are ignored.
    pub fn validate(&self, body: &Value) -> ValidationResult<CircuitFields> {
        let obj = body
            .as_object()
            .ok_or_else(|| ValidationError::new("\"value\" must be of type object"))?;

        let name = text_field(obj, "name")?;
        let location = text_field(obj, "location")?;

        let length_km = number_field(obj, "length_km")?;
        if length_km < MIN_LENGTH_KM {
            return Err(ValidationError::new(format!(
                "\"length_km\" must be greater than or equal to {}",
                MIN_LENGTH_KM
            )));
        }

        let laps = integer_field(obj, "laps", MIN_LAPS, MAX_COUNT)?;
        let drs_zones = integer_field(obj, "drs_zones", MIN_DRS_ZONES, MAX_COUNT)?;
        let opened = integer_field(
            obj,
            "opened",
            FIRST_OPENED_YEAR,
            i64::from(self.current_year),
        )?;

        Ok(CircuitFields {
            name,
            location,
            length_km,
            // Bounds above keep these in range.
            laps: laps as u32,
            drs_zones: drs_zones as u32,
            opened: opened as i32,
        })
    }
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> ValidationResult<&'a Value> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ValidationError::required(field)),
        Some(value) => Ok(value),
    }
}

fn text_field(obj: &Map<String, Value>, field: &str) -> ValidationResult<String> {
    let text = present(obj, field)?
        .as_str()
        .ok_or_else(|| ValidationError::new(format!("\"{}\" must be a string", field)))?;

    if text.is_empty() {
        return Err(ValidationError::new(format!(
            "\"{}\" is not allowed to be empty",
            field
        )));
    }
    if text.chars().count() < MIN_TEXT_LEN {
        return Err(ValidationError::new(format!(
            "\"{}\" length must be at least {} characters long",
            field, MIN_TEXT_LEN
        )));
    }
    Ok(text.to_string())
}

/// Numbers may arrive as JSON numbers or, from form posts, as numeric strings.
fn number_field(obj: &Map<String, Value>, field: &str) -> ValidationResult<f64> {
    let not_a_number = || ValidationError::new(format!("\"{}\" must be a number", field));

    let number = match present(obj, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(not_a_number()),
    }
}

fn integer_field(
    obj: &Map<String, Value>,
    field: &str,
    min: i64,
    max: i64,
) -> ValidationResult<i64> {
    let number = number_field(obj, field)?;
    if number.fract() != 0.0 || number.abs() > i64::MAX as f64 {
        return Err(ValidationError::new(format!(
            "\"{}\" must be an integer",
            field
        )));
    }

    let value = number as i64;
    if value < min {
        return Err(ValidationError::new(format!(
            "\"{}\" must be greater than or equal to {}",
            field, min
        )));
    }
    if value > max {
        return Err(ValidationError::new(format!(
            "\"{}\" must be less than or equal to {}",
            field, max
        )));
    }
    Ok(value)
}
