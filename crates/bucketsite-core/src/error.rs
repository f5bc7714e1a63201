//! Error taxonomy for bucketsite.
//!
//! Every provisioning step, upload and bulk sync reports failures as a
//! [`SiteError`]. The [`ErrorKind`] of an error is what ends up in reports,
//! so callers can aggregate failures without matching on messages.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Error type for all bucketsite operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A directory or file could not be read.
    #[error("filesystem error at {}: {message}", .path.display())]
    Filesystem {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error description.
        message: String,
    },

    /// The bucket could not be created (name taken or malformed).
    #[error("failed to create bucket {bucket}: {message}")]
    BucketCreation {
        /// Bucket name.
        bucket: String,
        /// Underlying error description.
        message: String,
    },

    /// The public-access block or the bucket policy was rejected.
    #[error("failed to apply policy to bucket {bucket}: {message}")]
    PolicyApplication {
        /// Bucket name.
        bucket: String,
        /// Underlying error description.
        message: String,
    },

    /// Reading, writing or deleting the website configuration failed.
    #[error("website configuration error on bucket {bucket}: {message}")]
    WebsiteConfig {
        /// Bucket name.
        bucket: String,
        /// Underlying error description.
        message: String,
    },

    /// A single object upload failed.
    #[error("failed to upload {key}: {message}")]
    Upload {
        /// Object key.
        key: String,
        /// Underlying error description.
        message: String,
    },

    /// The external sync utility failed to run or exited unsuccessfully.
    #[error("bulk sync failed: {0}")]
    Sync(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Stable, machine-readable classification of a [`SiteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`SiteError::Filesystem`].
    FilesystemError,
    /// See [`SiteError::BucketCreation`].
    BucketCreationError,
    /// See [`SiteError::PolicyApplication`].
    PolicyApplicationError,
    /// See [`SiteError::WebsiteConfig`].
    WebsiteConfigError,
    /// See [`SiteError::Upload`].
    UploadError,
    /// See [`SiteError::Sync`].
    SyncError,
    /// See [`SiteError::Config`].
    ConfigError,
    /// See [`SiteError::Internal`].
    InternalError,
}

impl ErrorKind {
    /// Snake-case name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FilesystemError => "filesystem_error",
            Self::BucketCreationError => "bucket_creation_error",
            Self::PolicyApplicationError => "policy_application_error",
            Self::WebsiteConfigError => "website_config_error",
            Self::UploadError => "upload_error",
            Self::SyncError => "sync_error",
            Self::ConfigError => "config_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SiteError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Filesystem { .. } => ErrorKind::FilesystemError,
            Self::BucketCreation { .. } => ErrorKind::BucketCreationError,
            Self::PolicyApplication { .. } => ErrorKind::PolicyApplicationError,
            Self::WebsiteConfig { .. } => ErrorKind::WebsiteConfigError,
            Self::Upload { .. } => ErrorKind::UploadError,
            Self::Sync(_) => ErrorKind::SyncError,
            Self::Config(_) => ErrorKind::ConfigError,
            Self::Internal(_) => ErrorKind::InternalError,
        }
    }
}

/// Convenience result type for bucketsite operations.
pub type SiteResult<T> = Result<T, SiteError>;
