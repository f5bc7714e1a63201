//! The storage seam.
//!
//! [`SiteStorage`] lists the handful of S3 calls the provisioner and the
//! publisher need. [`crate::S3Storage`] implements it with `aws-sdk-s3`;
//! tests substitute an in-memory recorder.
//!
//! The trait uses `#[async_trait]` so it stays object safe.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use bucketsite_core::{PublicAccessBlock, WebsitePolicy, WebsiteStatus};

/// Error returned by a storage call, independent of the SDK that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    /// Service error code (e.g. `BucketAlreadyExists`), when the service sent one.
    pub code: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl StorageError {
    /// Create an error with an optional service code.
    #[must_use]
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(ToOwned::to_owned),
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) if !self.message.contains(code.as_str()) => {
                write!(f, "{code}: {}", self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type of storage calls.
pub type StorageResult<T> = Result<T, StorageError>;

/// Bucket and object operations used to host a static site.
///
/// Each method is a single request/response round trip.
#[async_trait]
pub trait SiteStorage: Send + Sync {
    /// Create `bucket` in `region`, returning the reported location.
    async fn create_bucket(&self, bucket: &str, region: &str) -> StorageResult<Option<String>>;

    /// Replace the bucket's public-access-block configuration.
    async fn put_public_access_block(
        &self,
        bucket: &str,
        block: PublicAccessBlock,
    ) -> StorageResult<()>;

    /// Attach a JSON bucket policy.
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StorageResult<()>;

    /// Enable website hosting with the given documents.
    async fn put_bucket_website(&self, bucket: &str, website: &WebsitePolicy) -> StorageResult<()>;

    /// Read the website configuration; an absent configuration is not an error.
    async fn get_bucket_website(&self, bucket: &str) -> StorageResult<WebsiteStatus>;

    /// Remove the website configuration.
    async fn delete_bucket_website(&self, bucket: &str) -> StorageResult<()>;

    /// Stream the file at `path` into `bucket` under `key`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()>;
}
