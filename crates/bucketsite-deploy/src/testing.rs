//! In-memory [`SiteStorage`] that records every call.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bucketsite_core::{PublicAccessBlock, WebsitePolicy, WebsiteStatus};
use parking_lot::Mutex;

use crate::storage::{SiteStorage, StorageError, StorageResult};

#[derive(Debug, Default)]
struct State {
    calls: Vec<String>,
    buckets: HashSet<String>,
    regions: HashMap<String, String>,
    taken: HashSet<String>,
    denied_policies: HashSet<String>,
    failing_keys: HashSet<String>,
    objects: HashMap<(String, String), (Vec<u8>, String)>,
    policies: HashMap<String, Vec<String>>,
    access_blocks: HashMap<String, PublicAccessBlock>,
    websites: HashMap<String, WebsitePolicy>,
}

/// Shared, cloneable fake. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingStorage {
    state: Arc<Mutex<State>>,
}

impl RecordingStorage {
    /// Bucket names owned by someone else.
    pub(crate) fn with_taken_bucket(self, bucket: &str) -> Self {
        self.state.lock().taken.insert(bucket.to_owned());
        self
    }

    /// Buckets for which access-block and policy calls are denied.
    pub(crate) fn with_denied_policy(self, bucket: &str) -> Self {
        self.state.lock().denied_policies.insert(bucket.to_owned());
        self
    }

    /// Keys whose upload fails.
    pub(crate) fn with_failing_key(self, key: &str) -> Self {
        self.state.lock().failing_keys.insert(key.to_owned());
        self
    }

    /// Every call made, as `operation:bucket[/key]`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Stored object body and content type.
    pub(crate) fn object(&self, bucket: &str, key: &str) -> Option<(Vec<u8>, String)> {
        self.state
            .lock()
            .objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Region `bucket` was created in.
    pub(crate) fn bucket_region(&self, bucket: &str) -> Option<String> {
        self.state.lock().regions.get(bucket).cloned()
    }

    /// Policies attached to `bucket`, oldest first.
    pub(crate) fn policies(&self, bucket: &str) -> Vec<String> {
        self.state
            .lock()
            .policies
            .get(bucket)
            .cloned()
            .unwrap_or_default()
    }

    /// Current access block of `bucket`.
    pub(crate) fn access_block(&self, bucket: &str) -> Option<PublicAccessBlock> {
        self.state.lock().access_blocks.get(bucket).copied()
    }

    fn record(&self, call: String) {
        self.state.lock().calls.push(call);
    }

    fn require_bucket(state: &State, bucket: &str) -> StorageResult<()> {
        if state.buckets.contains(bucket) {
            Ok(())
        } else {
            Err(StorageError::new(
                Some("NoSuchBucket"),
                format!("The specified bucket does not exist: {bucket}"),
            ))
        }
    }

    fn require_policy_allowed(state: &State, bucket: &str) -> StorageResult<()> {
        Self::require_bucket(state, bucket)?;
        if state.denied_policies.contains(bucket) {
            return Err(StorageError::new(Some("AccessDenied"), "Access Denied"));
        }
        Ok(())
    }
}

#[async_trait]
impl SiteStorage for RecordingStorage {
    async fn create_bucket(&self, bucket: &str, region: &str) -> StorageResult<Option<String>> {
        self.record(format!("create_bucket:{bucket}"));
        let mut state = self.state.lock();
        if state.taken.contains(bucket) || state.buckets.contains(bucket) {
            return Err(StorageError::new(
                Some("BucketAlreadyExists"),
                format!("The requested bucket name is not available: {bucket}"),
            ));
        }
        state.buckets.insert(bucket.to_owned());
        state.regions.insert(bucket.to_owned(), region.to_owned());
        Ok(Some(format!("/{bucket}")))
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        block: PublicAccessBlock,
    ) -> StorageResult<()> {
        self.record(format!("put_public_access_block:{bucket}"));
        let mut state = self.state.lock();
        Self::require_policy_allowed(&state, bucket)?;
        state.access_blocks.insert(bucket.to_owned(), block);
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StorageResult<()> {
        self.record(format!("put_bucket_policy:{bucket}"));
        let mut state = self.state.lock();
        Self::require_policy_allowed(&state, bucket)?;
        state
            .policies
            .entry(bucket.to_owned())
            .or_default()
            .push(policy.to_owned());
        Ok(())
    }

    async fn put_bucket_website(&self, bucket: &str, website: &WebsitePolicy) -> StorageResult<()> {
        self.record(format!("put_bucket_website:{bucket}"));
        let mut state = self.state.lock();
        Self::require_bucket(&state, bucket)?;
        state.websites.insert(bucket.to_owned(), website.clone());
        Ok(())
    }

    async fn get_bucket_website(&self, bucket: &str) -> StorageResult<WebsiteStatus> {
        self.record(format!("get_bucket_website:{bucket}"));
        let state = self.state.lock();
        Self::require_bucket(&state, bucket)?;
        Ok(state
            .websites
            .get(bucket)
            .map_or(WebsiteStatus::NotConfigured, |w| WebsiteStatus::Configured {
                index_suffix: Some(w.index_document.to_owned()),
            }))
    }

    async fn delete_bucket_website(&self, bucket: &str) -> StorageResult<()> {
        self.record(format!("delete_bucket_website:{bucket}"));
        let mut state = self.state.lock();
        Self::require_bucket(&state, bucket)?;
        state.websites.remove(bucket);
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        self.record(format!("put_object:{bucket}/{key}"));
        let body = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::new(None, e.to_string()))?;

        let mut state = self.state.lock();
        Self::require_bucket(&state, bucket)?;
        if state.failing_keys.contains(key) {
            return Err(StorageError::new(Some("InternalError"), "injected failure"));
        }
        state.objects.insert(
            (bucket.to_owned(), key.to_owned()),
            (body, content_type.to_owned()),
        );
        Ok(())
    }
}
