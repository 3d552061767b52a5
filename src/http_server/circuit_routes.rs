//! Circuit HTTP Routes
//!
//! CRUD endpoints for circuits, mounted under `/api`.
//!
//! Writes validate before touching the image intake or the store, so a
//! rejected body never leaves anything behind.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, warn};

use super::config::ServerMode;
use super::errors::{ApiError, ApiResult};
use super::payload::{CircuitPayload, ImageUpload};
use crate::circuit::{Circuit, CircuitValidator};
use crate::images::{ImageIntake, StoredImage};
use crate::store::{SharedStore, StoreResult};

// ==================
// Shared State
// ==================

/// Default cap on a write request body, image included
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// State shared by the circuit handlers
#[derive(Debug, Clone)]
pub struct CircuitState {
    pub store: SharedStore,
    pub images: ImageIntake,
    pub mode: ServerMode,
    /// Fixed upper bound for `opened`; the current year when `None`
    pub opened_year_cap: Option<i32>,
    /// Largest accepted write body in bytes
    pub max_upload_bytes: usize,
}

impl CircuitState {
    pub fn new(store: SharedStore, images: ImageIntake, mode: ServerMode) -> Self {
        Self {
            store,
            images,
            mode,
            opened_year_cap: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Cap write bodies at `bytes`
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Pin the `opened` upper bound instead of reading the clock
    pub fn with_opened_year_cap(mut self, year: i32) -> Self {
        self.opened_year_cap = Some(year);
        self
    }

    fn validator(&self) -> CircuitValidator {
        self.opened_year_cap
            .map(CircuitValidator::for_year)
            .unwrap_or_default()
    }

    async fn store_image(&self, upload: Option<ImageUpload>) -> ApiResult<Option<StoredImage>> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        let stored = self
            .images
            .save(upload.file_name.as_deref(), upload.data)
            .await?;
        Ok(Some(stored))
    }

    /// Settle a store write; an image saved for a failed write is removed again
    async fn finish_write(
        &self,
        result: StoreResult<Circuit>,
        image: Option<StoredImage>,
    ) -> ApiResult<Circuit> {
        match result {
            Ok(circuit) => Ok(circuit),
            Err(err) => {
                if let Some(image) = image {
                    if let Err(discard_err) = self.images.discard(&image).await {
                        warn!(
                            file = %image.file_name,
                            error = %discard_err,
                            "failed to remove image after store error"
                        );
                    }
                }
                Err(err.into())
            }
        }
    }
}

// ==================
// Circuit Routes
// ==================

/// Create circuit routes. Write routes are only mounted in read-write mode.
pub fn circuit_routes(state: Arc<CircuitState>) -> Router {
    let (collection, item) = if state.mode.allows_writes() {
        (
            get(list_circuits_handler).post(create_circuit_handler),
            get(get_circuit_handler)
                .put(update_circuit_handler)
                .delete(delete_circuit_handler),
        )
    } else {
        (get(list_circuits_handler), get(get_circuit_handler))
    };

    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/circuits", collection)
        .route("/circuits/:id", item)
        .layer(body_limit)
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_circuits_handler(
    State(state): State<Arc<CircuitState>>,
) -> ApiResult<Json<Vec<Circuit>>> {
    let circuits = state.store.list_all().await?;
    Ok(Json(circuits))
}

async fn get_circuit_handler(
    State(state): State<Arc<CircuitState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Circuit>> {
    let circuit = state.store.find_by_id(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(circuit))
}

async fn create_circuit_handler(
    State(state): State<Arc<CircuitState>>,
    payload: CircuitPayload,
) -> ApiResult<(StatusCode, Json<Circuit>)> {
    let fields = state.validator().validate(&payload.body)?;
    let image = state.store_image(payload.image).await?;

    let result = state
        .store
        .insert(fields, image.as_ref().map(|i| i.public_path.clone()))
        .await;
    let circuit = state.finish_write(result, image).await?;

    info!(id = %circuit.id, slug = %circuit.slug, "circuit created");
    Ok((StatusCode::CREATED, Json(circuit)))
}

async fn update_circuit_handler(
    State(state): State<Arc<CircuitState>>,
    Path(id): Path<String>,
    payload: CircuitPayload,
) -> ApiResult<Json<Circuit>> {
    // Unknown ids are reported before the body is looked at.
    if state.store.find_by_id(&id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let fields = state.validator().validate(&payload.body)?;
    let image = state.store_image(payload.image).await?;

    let result = state
        .store
        .update(&id, fields, image.as_ref().map(|i| i.public_path.clone()))
        .await;
    let circuit = state.finish_write(result, image).await?;

    info!(id = %circuit.id, slug = %circuit.slug, "circuit updated");
    Ok(Json(circuit))
}

async fn delete_circuit_handler(
    State(state): State<Arc<CircuitState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Circuit>> {
    let circuit = state.store.delete(&id).await?;

    info!(id = %circuit.id, "circuit deleted");
    Ok(Json(circuit))
}
