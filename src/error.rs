use thiserror::Error;

/// Error returned by the object storage backend.
///
/// Backend failures (network, credentials, quota, missing container) are not
/// classified: the message is whatever the backend reported and is passed
/// through to clients unchanged.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    /// Wrap a backend error message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend's error text.
    pub fn message(&self) -> &str {
        &self.message
    }
}
