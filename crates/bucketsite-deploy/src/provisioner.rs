//! Bucket provisioning for static website hosting.
//!
//! A new site needs four calls, in this order:
//!
//! ```text
//! create_bucket -> relax_public_access_block -> apply_public_read_policy -> enable_website_hosting
//! ```
//!
//! The order is a convention, not an enforced dependency: with
//! [`FailurePolicy::Continue`] every step runs even when an earlier one
//! failed, and each cascading failure is recorded on its own.

use bucketsite_core::{
    ClientConfig, FailurePolicy, ProvisionReport, PublicAccessBlock, SiteError, SiteResult, Step, StepReport,
    WebsitePolicy, WebsiteStatus, public_read_policy,
};
use tracing::{info, warn};

use crate::storage::SiteStorage;

/// Applies bucket-level configuration through a [`SiteStorage`].
#[derive(Debug, Clone)]
pub struct BucketProvisioner<S> {
    storage: S,
    region: String,
    website: WebsitePolicy,
    failure_policy: FailurePolicy,
}

impl<S: SiteStorage> BucketProvisioner<S> {
    /// Create a provisioner for buckets in `region`.
    pub fn new(storage: S, region: impl Into<String>) -> Self {
        Self {
            storage,
            region: region.into(),
            website: WebsitePolicy::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Create a provisioner for buckets in the region `client` signs for.
    ///
    /// In mock mode that is the emulator region, whatever region the
    /// deployment target names.
    pub fn for_client(storage: S, client: &ClientConfig) -> Self {
        Self::new(storage, client.region.clone())
    }

    /// Set what [`provision`](Self::provision) does after a failed step.
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Create the bucket and return the location the service reported.
    pub async fn create_bucket(&self, bucket: &str) -> SiteResult<String> {
        let location = self
            .storage
            .create_bucket(bucket, &self.region)
            .await
            .map_err(|e| SiteError::BucketCreation {
                bucket: bucket.to_owned(),
                message: e.to_string(),
            })?;

        let location = location.unwrap_or_default();
        info!(bucket = %bucket, location = %location, "bucket created");
        Ok(location)
    }

    /// Disable all four public-access-block flags.
    pub async fn relax_public_access_block(&self, bucket: &str) -> SiteResult<String> {
        self.storage
            .put_public_access_block(bucket, PublicAccessBlock::relaxed())
            .await
            .map_err(|e| SiteError::PolicyApplication {
                bucket: bucket.to_owned(),
                message: e.to_string(),
            })?;

        info!(bucket = %bucket, "public access block relaxed");
        Ok("public access block disabled".to_owned())
    }

    /// Attach the anonymous-read policy covering `bucket/*`.
    pub async fn apply_public_read_policy(&self, bucket: &str) -> SiteResult<String> {
        let policy = public_read_policy(bucket);
        self.storage
            .put_bucket_policy(bucket, &policy)
            .await
            .map_err(|e| SiteError::PolicyApplication {
                bucket: bucket.to_owned(),
                message: e.to_string(),
            })?;

        info!(bucket = %bucket, "public read policy applied");
        Ok("public read policy attached".to_owned())
    }

    /// Serve `index.html` for directory-style paths.
    pub async fn enable_website_hosting(&self, bucket: &str) -> SiteResult<String> {
        self.storage
            .put_bucket_website(bucket, &self.website)
            .await
            .map_err(|e| SiteError::WebsiteConfig {
                bucket: bucket.to_owned(),
                message: e.to_string(),
            })?;

        info!(bucket = %bucket, index = self.website.index_document, "website hosting enabled");
        Ok(format!("index document {}", self.website.index_document))
    }

    /// Read the website configuration. An absent configuration is not an error.
    pub async fn website_config(&self, bucket: &str) -> SiteResult<WebsiteStatus> {
        let status = self
            .storage
            .get_bucket_website(bucket)
            .await
            .map_err(|e| SiteError::WebsiteConfig {
                bucket: bucket.to_owned(),
                message: e.to_string(),
            })?;

        info!(bucket = %bucket, status = %status, "website configuration read");
        Ok(status)
    }

    /// Remove the website configuration.
    pub async fn disable_website_hosting(&self, bucket: &str) -> SiteResult<String> {
        self.storage
            .delete_bucket_website(bucket)
            .await
            .map_err(|e| SiteError::WebsiteConfig {
                bucket: bucket.to_owned(),
                message: e.to_string(),
            })?;

        info!(bucket = %bucket, "website hosting disabled");
        Ok("website configuration deleted".to_owned())
    }

    /// Run the four provisioning steps in order.
    pub async fn provision(&self, bucket: &str) -> ProvisionReport {
        let mut report = ProvisionReport::default();

        let outcome = self.create_bucket(bucket).await;
        if self.record(&mut report, Step::CreateBucket, outcome) {
            return report;
        }
        let outcome = self.relax_public_access_block(bucket).await;
        if self.record(&mut report, Step::RelaxPublicAccessBlock, outcome) {
            return report;
        }
        let outcome = self.apply_public_read_policy(bucket).await;
        if self.record(&mut report, Step::ApplyPublicReadPolicy, outcome) {
            return report;
        }
        let outcome = self.enable_website_hosting(bucket).await;
        self.record(&mut report, Step::EnableWebsiteHosting, outcome);

        report
    }

    /// Append a step outcome; returns `true` when provisioning must stop.
    fn record(&self, report: &mut ProvisionReport, step: Step, outcome: SiteResult<String>) -> bool {
        let failed = match &outcome {
            Ok(_) => false,
            Err(e) => {
                warn!(step = %step, kind = %e.kind(), error = %e, "provisioning step failed");
                true
            }
        };
        report.steps.push(StepReport::new(step, outcome));

        if failed && self.failure_policy == FailurePolicy::Abort {
            warn!(step = %step, "aborting provisioning after failed step");
            return true;
        }
        false
    }
}
