//! # HTTP Server
//!
//! Combines the circuit API, the health check, and optional static assets
//! into one Axum router.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::circuit_routes::{circuit_routes, CircuitState};
use super::config::ServerConfig;
use super::observability_routes::health_routes;
use crate::images::{ImageIntake, LocalBackend};
use crate::store::{DocumentStore, MemoryStore, SharedStore, StoreResult};

/// Open the store named by the configuration.
///
/// A `database_url` selects the document store; otherwise circuits live in
/// memory, optionally seeded with the reference set.
pub fn open_store(config: &ServerConfig) -> StoreResult<SharedStore> {
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let store = DocumentStore::connect(url)?;
            info!(location = store.location(), "opened document store");
            Arc::new(store)
        }
        None if config.seed => Arc::new(MemoryStore::seeded()),
        None => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

/// HTTP server for the circuit API
pub struct CircuitServer {
    config: ServerConfig,
    router: Router,
}

impl CircuitServer {
    /// Create a server with the store the configuration names
    pub fn from_config(config: ServerConfig) -> StoreResult<Self> {
        let store = open_store(&config)?;
        Ok(Self::with_store(config, store))
    }

    /// Create a server around an existing store
    pub fn with_store(config: ServerConfig, store: SharedStore) -> Self {
        let images = ImageIntake::new(
            LocalBackend::new(config.upload_dir.clone()),
            config.image_url_prefix.clone(),
        );
        let state = Arc::new(
            CircuitState::new(store, images, config.mode)
                .with_max_upload_bytes(config.max_upload_bytes),
        );
        Self::with_state(config, state)
    }

    /// Create a server around prepared handler state
    pub fn with_state(config: ServerConfig, state: Arc<CircuitState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig, state: Arc<CircuitState>) -> Router {
        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let mut router = Router::new()
            .merge(health_routes(state.clone()))
            .nest("/api", circuit_routes(state))
            // Uploaded images
            .nest_service(
                &config.image_url_prefix,
                ServeDir::new(&config.upload_dir),
            );

        // Everything else falls through to the static site, if any
        if let Some(static_dir) = &config.static_dir {
            router = router.fallback_service(ServeDir::new(static_dir));
        }

        router.layer(TraceLayer::new_for_http()).layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        info!(
            addr = %listener.local_addr()?,
            mode = self.config.mode.as_str(),
            "Server is listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler; run until the process is killed.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn config_in(temp: &TempDir) -> ServerConfig {
        ServerConfig {
            upload_dir: temp.path().join("images"),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_server_with_custom_port() {
        let temp = TempDir::new().unwrap();
        let config = ServerConfig {
            port: 8080,
            ..config_in(&temp)
        };
        let server = CircuitServer::from_config(config).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_open_store_variants() {
        let config = ServerConfig::default();
        assert_eq!(open_store(&config).unwrap().backend(), "memory");

        let config = ServerConfig {
            database_url: Some("sqlite::memory:".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(open_store(&config).unwrap().backend(), "document");
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let temp = TempDir::new().unwrap();
        let router = CircuitServer::from_config(config_in(&temp)).unwrap().router();

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["backend"], "memory");
        assert_eq!(json["mode"], "read-write");
    }

    #[tokio::test]
    async fn test_static_fallback_serves_index() {
        let temp = TempDir::new().unwrap();
        let site = temp.path().join("public");
        std::fs::create_dir_all(&site).unwrap();
        std::fs::write(site.join("index.html"), "<h1>Circuits</h1>").unwrap();

        let config = ServerConfig {
            static_dir: Some(site),
            ..config_in(&temp)
        };
        let router = CircuitServer::from_config(config).unwrap().router();

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>Circuits</h1>");
    }
}
