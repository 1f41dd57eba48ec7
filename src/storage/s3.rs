use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

use super::{ObjectRef, ObjectStore};
use crate::error::StorageError;

/// Maximum keys requested per `ListObjectsV2` page.
const LIST_PAGE_SIZE: i32 = 1000;

/// S3-backed implementation of `ObjectStore`.
///
/// Works against AWS S3 and S3-compatible services (MinIO, R2, etc.).
/// The container is an S3 bucket; object keys are used as-is.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new store for `bucket`.
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Fetch at most `max_keys` keys from the first listing page.
    ///
    /// Used at startup to verify the credentials and bucket.
    pub async fn check_access(&self, max_keys: i32) -> Result<Vec<ObjectRef>, StorageError> {
        let result = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(max_keys)
            .send()
            .await
            .map_err(|e| StorageError::backend(DisplayErrorContext(&e).to_string()))?;

        Ok(result.contents().iter().filter_map(to_object_ref).collect())
    }
}

fn to_object_ref(obj: &aws_sdk_s3::types::Object) -> Option<ObjectRef> {
    obj.key().map(|key| ObjectRef {
        name: key.to_string(),
        size: obj.size().and_then(|s| u64::try_from(s).ok()),
    })
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        let len = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::backend(DisplayErrorContext(&e).to_string()))?;

        debug!(bucket = %self.bucket, key = key, bytes = len, "Stored object");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ObjectRef>, StorageError> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .max_keys(LIST_PAGE_SIZE);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let result = request
                .send()
                .await
                .map_err(|e| StorageError::backend(DisplayErrorContext(&e).to_string()))?;

            objects.extend(result.contents().iter().filter_map(to_object_ref));

            if result.is_truncated() == Some(true) {
                continuation_token = result.next_continuation_token().map(|s| s.to_string());
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!(bucket = %self.bucket, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    fn container(&self) -> &str {
        &self.bucket
    }
}

/// Create an S3 client from explicit static credentials.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1", "key", "secret").await;
/// ```
///
/// For AWS S3, pass `None` to use the default endpoint.
pub async fn create_s3_client(
    endpoint_url: Option<&str>,
    region: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "static");

    let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(region)
        .credentials_provider(credentials);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services generally need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
