//! Uploads a build directory into the site bucket, one object per file.

use std::path::Path;

use bucketsite_core::{
    FileUploadTask, PublishReport, SiteError, SiteResult, UploadOutcome, content_type_for,
    upload_tasks,
};
use tracing::{debug, info, warn};

use crate::storage::SiteStorage;

/// Sequential per-file publisher.
///
/// Uploads are issued one after another. A failed upload is recorded and the
/// loop moves on; nothing is rolled back, so a partial publish leaves a mix
/// of old and new objects in the bucket.
#[derive(Debug, Clone)]
pub struct SitePublisher<S> {
    storage: S,
    bucket: String,
    key_prefix: Option<String>,
}

impl<S: SiteStorage> SitePublisher<S> {
    /// Create a publisher targeting `bucket`.
    pub fn new(storage: S, bucket: impl Into<String>) -> Self {
        Self {
            storage,
            bucket: bucket.into(),
            key_prefix: None,
        }
    }

    /// Prepend `prefix` to every object key.
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: Option<String>) -> Self {
        self.key_prefix = prefix;
        self
    }

    /// Upload every regular file under `root`.
    ///
    /// Fails only when the directory cannot be listed; upload failures are
    /// reported per file in the returned [`PublishReport`].
    pub async fn publish(&self, root: &Path) -> SiteResult<PublishReport> {
        let tasks = upload_tasks(root, self.key_prefix.as_deref())?;
        info!(bucket = %self.bucket, root = %root.display(), files = tasks.len(), "publishing site");

        let mut uploads = Vec::with_capacity(tasks.len());
        for task in tasks {
            let result = self.upload_file(&task).await;
            uploads.push(UploadOutcome {
                key: task.relative_key,
                path: task.absolute_path,
                result,
            });
        }

        let report = PublishReport {
            bucket: self.bucket.clone(),
            root: root.to_path_buf(),
            uploads,
        };
        info!(
            bucket = %self.bucket,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "publish finished"
        );
        Ok(report)
    }

    /// Upload a single file under its key.
    pub async fn upload_file(&self, task: &FileUploadTask) -> SiteResult<()> {
        let content_type = content_type_for(&task.absolute_path);
        match self
            .storage
            .put_object(
                &self.bucket,
                &task.relative_key,
                &task.absolute_path,
                &content_type,
            )
            .await
        {
            Ok(()) => {
                debug!(
                    bucket = %self.bucket,
                    key = %task.relative_key,
                    content_type = %content_type,
                    "uploaded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    bucket = %self.bucket,
                    path = %task.absolute_path.display(),
                    error = %e,
                    "upload failed"
                );
                Err(SiteError::Upload {
                    key: task.relative_key.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}
