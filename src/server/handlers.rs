//! HTTP request handlers for the upload and gallery API.
//!
//! # Endpoints
//!
//! - `POST /api/v1/upload` - Store an image from a multipart form
//! - `GET /api/v1/gallery` - List public URLs of stored images
//! - `GET /health` - Health check endpoint
//! - `GET /` - Landing page

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::error::StorageError;
use crate::naming::{timestamp_prefix, Clock, SystemClock};
use crate::storage::{ObjectStore, StorageGateway};

use super::index::generate_index_html;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Required prefix of the declared content-type.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state, passed to handlers via Axum's State extractor.
pub struct AppState<S: ObjectStore> {
    /// Handle to the image container
    pub gateway: Arc<StorageGateway<S>>,

    /// Time source for object key prefixes
    pub clock: Arc<dyn Clock>,
}

impl<S: ObjectStore> AppState<S> {
    /// Create state using the system clock.
    pub fn new(gateway: StorageGateway<S>) -> Self {
        Self::with_clock(gateway, Arc::new(SystemClock))
    }

    /// Create state with a custom clock.
    pub fn with_clock(gateway: StorageGateway<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            clock,
        }
    }
}

impl<S: ObjectStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            clock: Arc::clone(&self.clock),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON body returned for every failed API request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub ok: bool,

    /// Human-readable reason
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

/// Successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,

    /// Public URL of the stored object
    pub url: String,
}

/// Gallery listing.
#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub ok: bool,

    /// Public URLs of all stored objects, in backend order
    pub gallery: Vec<String>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Errors produced by the API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The form has no `file` file part (or the request is not a multipart form)
    #[error("No file part")]
    MissingFile,

    /// The `file` field has no filename
    #[error("No selected file")]
    EmptyFilename,

    /// Declared content-type is not `image/*`
    #[error("Invalid content type")]
    InvalidContentType { content_type: Option<String> },

    /// The multipart body could not be read
    #[error("{message}")]
    Multipart { status: StatusCode, message: String },

    /// The storage backend failed
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::EmptyFilename | ApiError::InvalidContentType { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Multipart { status, .. } => *status,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

/// Convert ApiError to an HTTP response.
///
/// 5xx errors are logged at ERROR level, 4xx at WARN.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "Server error: {}", message);
        } else if let ApiError::InvalidContentType { content_type } = &self {
            warn!(
                status = status.as_u16(),
                content_type = ?content_type,
                "Client error: {}",
                message
            );
        } else {
            warn!(status = status.as_u16(), "Client error: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image uploads.
///
/// # Endpoint
///
/// `POST /api/v1/upload` with a `multipart/form-data` body containing a
/// `file` field.
///
/// # Validation
///
/// Checked in order, each failing with `400 Bad Request`:
/// 1. a `file` part with a filename parameter is present (`"No file part"`)
/// 2. the filename is non-empty (`"No selected file"`)
/// 3. its declared content-type starts with `image/` (`"Invalid content type"`)
///
/// # Response
///
/// `200 OK` with `{"ok": true, "url": "<public url>"}`. The object key is
/// the sanitized filename prefixed with the UTC upload time. A storage
/// failure returns `500` with the backend's message.
pub async fn upload_handler<S>(
    State(state): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError>
where
    S: ObjectStore + 'static,
{
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Upload is not a multipart form: {}", rejection.body_text());
        ApiError::MissingFile
    })?;

    let field = loop {
        match multipart.next_field().await? {
            // Parts without a filename parameter are plain form values
            Some(field) if field.name() == Some(FILE_FIELD) && field.file_name().is_some() => {
                break field
            }
            Some(_) => continue,
            None => return Err(ApiError::MissingFile),
        }
    };

    let filename = match field.file_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(ApiError::EmptyFilename),
    };

    // The raw header, not the parsed mime type, which is lowercased
    let content_type = match declared_content_type(&field) {
        Some(ct) if ct.starts_with(IMAGE_CONTENT_TYPE_PREFIX) => ct.to_string(),
        other => {
            return Err(ApiError::InvalidContentType {
                content_type: other.map(str::to_string),
            })
        }
    };

    let key = timestamp_prefix(&filename, state.clock.now());
    let body = field.bytes().await?;
    let size = body.len();

    state.gateway.put(&key, body, &content_type).await?;

    info!(
        key = %key,
        content_type = %content_type,
        bytes = size,
        "Stored upload"
    );

    Ok(Json(UploadResponse {
        ok: true,
        url: state.gateway.url_for(&key),
    }))
}

/// The part's `Content-Type` header exactly as the client sent it.
fn declared_content_type<'a>(field: &'a Field<'_>) -> Option<&'a str> {
    field
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Handle gallery requests.
///
/// # Endpoint
///
/// `GET /api/v1/gallery`
///
/// # Response
///
/// `200 OK` with `{"ok": true, "gallery": ["<url>", ...]}` listing every
/// object in the container, unpaginated, in backend order.
pub async fn gallery_handler<S>(
    State(state): State<AppState<S>>,
) -> Result<Json<GalleryResponse>, ApiError>
where
    S: ObjectStore + 'static,
{
    let objects = state.gateway.list().await?;

    debug!(count = objects.len(), "Listed gallery");

    let gallery = objects
        .iter()
        .map(|obj| state.gateway.url_for(&obj.name))
        .collect();

    Ok(Json(GalleryResponse { ok: true, gallery }))
}

/// Serve the landing page.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler<S>(State(state): State<AppState<S>>) -> Html<String>
where
    S: ObjectStore + 'static,
{
    Html(generate_index_html(state.gateway.container()))
}

/// Handle health check requests.
///
/// Returns `200 OK` with the plain text body `OK`. Storage reachability is
/// not checked.
pub async fn health_handler() -> &'static str {
    "OK"
}

// =============================================================================
// Tests
// =============================================================================
