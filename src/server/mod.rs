//! HTTP server layer for the image gallery.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │      POST /api/v1/upload      GET /api/v1/gallery               │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    index    │  │        routes           │  │
//! │  │ (requests)  │  │ (landing)   │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod index;
pub mod routes;

pub use handlers::{
    gallery_handler, health_handler, index_handler, upload_handler, ApiError, AppState,
    ErrorResponse, GalleryResponse, UploadResponse,
};
pub use routes::{create_router, create_router_with_clock, RouterConfig};
