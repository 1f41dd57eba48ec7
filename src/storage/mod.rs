//! Object storage layer.
//!
//! Uploaded images live in a single container of an external object store.
//! This module exposes that container through a small gateway:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            StorageGateway               │
//! │   (put / list / public URL builder)     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           ObjectStore trait             │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//!             ┌─────────────────┐
//!             │  S3ObjectStore  │
//!             └─────────────────┘
//! ```
//!
//! Nothing here retries, caches or locks. Consistency is whatever the
//! backend provides.

mod gateway;
mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;

pub use gateway::StorageGateway;
pub use s3::{create_s3_client, S3ObjectStore};

/// A stored object as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// Object key within the container.
    pub name: String,

    /// Size in bytes, when the backend reports it.
    pub size: Option<u64>,
}

/// A single object storage container.
///
/// Implementations must be safe to share between concurrently running
/// requests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` at `key`, replacing any existing object.
    ///
    /// The stored content-type metadata is set to `content_type`.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// List every object in the container, in backend order.
    async fn list(&self) -> Result<Vec<ObjectRef>, StorageError>;

    /// Name of the container (bucket) this store writes to.
    fn container(&self) -> &str;
}
