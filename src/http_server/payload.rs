//! Circuit write payloads
//!
//! Accepts either a JSON body or a `multipart/form-data` form whose text
//! fields mirror the JSON keys and whose optional `image` part carries the
//! circuit image. Both end up as a JSON object for the validator.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use super::errors::ApiError;

/// Name of the multipart part holding the image
pub const IMAGE_FIELD: &str = "image";

/// An uploaded image, not yet written anywhere
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Candidate circuit body plus optional image
#[derive(Debug, Clone)]
pub struct CircuitPayload {
    pub body: Value,
    pub image: Option<ImageUpload>,
}

fn content_type(req: &Request) -> &str {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .trim_start()
}

fn is_multipart(content_type: &str) -> bool {
    content_type.starts_with("multipart/form-data")
}

/// `application/json` or any `+json` media type
fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

#[async_trait]
impl<S> FromRequest<S> for CircuitPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = content_type(&req).to_string();

        if is_multipart(&content_type) {
            let multipart = Multipart::from_request(req, state).await?;
            return read_form(multipart).await;
        }

        // Bodies of any other type are not read and validate like `{}`.
        if !is_json(&content_type) {
            return Ok(Self {
                body: Value::Object(Map::new()),
                image: None,
            });
        }

        let bytes = Bytes::from_request(req, state).await?;

        // An empty body validates like an empty object.
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?
        };

        Ok(Self { body, image: None })
    }
}

async fn read_form(mut multipart: Multipart) -> Result<CircuitPayload, ApiError> {
    let mut fields = Map::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await?;
            // Browsers send an empty part when no file was picked.
            if !data.is_empty() {
                image = Some(ImageUpload { file_name, data });
            }
        } else {
            let text = field.text().await?;
            fields.insert(name, Value::String(text));
        }
    }

    Ok(CircuitPayload {
        body: Value::Object(fields),
        image,
    })
}
