//! # Image Gallery
//!
//! A small upload-and-gallery service for images stored in S3-compatible
//! object storage.
//!
//! Clients upload images as multipart forms; each file is stored under a
//! sanitized, timestamped key and its public URL is returned. The gallery
//! endpoint lists every stored object as a public URL.
//!
//! ## Architecture
//!
//! - [`naming`] - Filename sanitization and timestamped object keys
//! - [`storage`] - Object store trait, S3 backend and the storage gateway
//! - [`server`] - Axum-based HTTP handlers and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_gallery::{create_router, create_s3_client, RouterConfig, S3ObjectStore, StorageGateway};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = create_s3_client(None, "us-east-1", "access-key", "secret-key").await;
//!     let store = S3ObjectStore::new(client, "images".to_string());
//!     let gateway = StorageGateway::new(store, "https://images.example.com");
//!
//!     let router = create_router(gateway, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod naming;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use config::{CheckConfig, Cli, Command, ServeConfig, StorageConfig};
pub use error::StorageError;
pub use naming::{sanitize, timestamp_prefix, Clock, FixedClock, SystemClock};
pub use server::{
    create_router, create_router_with_clock, gallery_handler, health_handler, index_handler,
    upload_handler, ApiError, AppState, ErrorResponse, GalleryResponse, RouterConfig,
    UploadResponse,
};
pub use storage::{create_s3_client, ObjectRef, ObjectStore, S3ObjectStore, StorageGateway};
