//! Router configuration for the image gallery.
//!
//! This module defines the HTTP routes and applies middleware for body
//! limits, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                  - Landing page
//! /health            - Health check
//! /api/v1/upload     - Upload an image (POST, multipart)
//! /api/v1/gallery    - List image URLs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use image_gallery::server::routes::{create_router, RouterConfig};
//! use image_gallery::storage::{create_s3_client, S3ObjectStore, StorageGateway};
//!
//! let client = create_s3_client(None, "us-east-1", "key", "secret").await;
//! let store = S3ObjectStore::new(client, "images".to_string());
//! let gateway = StorageGateway::new(store, "https://images.example.com");
//!
//! let router = create_router(gateway, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{gallery_handler, health_handler, index_handler, upload_handler, AppState};
use crate::config::DEFAULT_MAX_UPLOAD_SIZE;
use crate::naming::{Clock, SystemClock};
use crate::storage::{ObjectStore, StorageGateway};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum accepted upload body in bytes
    pub max_upload_size: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with defaults.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Uploads are limited to 16 MiB
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the maximum upload body size in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router using the system clock.
pub fn create_router<S>(gateway: StorageGateway<S>, config: RouterConfig) -> Router
where
    S: ObjectStore + 'static,
{
    create_router_with_clock(gateway, Arc::new(SystemClock), config)
}

/// Create the application router with an explicit clock for upload keys.
pub fn create_router_with_clock<S>(
    gateway: StorageGateway<S>,
    clock: Arc<dyn Clock>,
    config: RouterConfig,
) -> Router
where
    S: ObjectStore + 'static,
{
    let app_state = AppState::with_clock(gateway, clock);

    let cors = build_cors_layer(&config);

    let api_routes = Router::new()
        .route(
            "/upload",
            post(upload_handler::<S>).layer(DefaultBodyLimit::max(config.max_upload_size)),
        )
        .route("/gallery", get(gallery_handler::<S>));

    let router = Router::new()
        .route("/", get(index_handler::<S>))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes)
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
