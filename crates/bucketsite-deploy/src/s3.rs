//! [`SiteStorage`] over `aws-sdk-s3`.

use std::path::Path;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
    PublicAccessBlockConfiguration, WebsiteConfiguration,
};
use aws_smithy_runtime_api::client::result::SdkError;
use bucketsite_core::{
    ClientConfig, PublicAccessBlock, StaticCredentials, WebsitePolicy, WebsiteStatus,
};
use tracing::debug;

use crate::storage::{SiteStorage, StorageError, StorageResult};

/// Error code returned by GetBucketWebsite when hosting is off.
const NO_SUCH_WEBSITE_CONFIGURATION: &str = "NoSuchWebsiteConfiguration";

/// Region that must not be sent as a location constraint.
const US_EAST_1: &str = "us-east-1";

/// Name attached to credentials built from the environment.
const CREDENTIALS_SOURCE: &str = "bucketsite";

/// S3-backed storage.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client for `config` and wrap it.
    pub async fn connect(config: &ClientConfig) -> Self {
        Self::new(build_client(config).await)
    }

    /// The underlying SDK client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn sdk_credentials(creds: &StaticCredentials) -> Credentials {
    Credentials::new(
        creds.access_key_id.clone(),
        creds.secret_access_key.clone(),
        None,
        None,
        CREDENTIALS_SOURCE,
    )
}

/// Create an S3 client from a resolved [`ClientConfig`].
///
/// With an endpoint override and explicit credentials (mock mode) the client
/// is built directly and never consults the ambient AWS configuration.
/// Otherwise the SDK default chain supplies whatever the config leaves out.
pub async fn build_client(config: &ClientConfig) -> Client {
    let region = Region::new(config.region.clone());

    if let (Some(endpoint), Some(creds)) = (&config.endpoint_override, &config.credentials) {
        debug!(endpoint = %endpoint, region = %config.region, "building emulator S3 client");
        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(sdk_credentials(creds))
            .endpoint_url(endpoint)
            .force_path_style(config.force_path_style)
            .build();
        return Client::from_conf(s3_config);
    }

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
    if let Some(endpoint) = &config.endpoint_override {
        loader = loader.endpoint_url(endpoint);
    }
    if let Some(creds) = &config.credentials {
        loader = loader.credentials_provider(sdk_credentials(creds));
    }
    let sdk_config = loader.load().await;
    debug!(region = %config.region, "loaded default AWS configuration");

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.force_path_style)
        .build();
    Client::from_conf(s3_config)
}

/// Convert an SDK failure into a [`StorageError`], keeping the service code.
fn storage_error<E, R>(err: &SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(err).to_string(), ToOwned::to_owned);
    StorageError::new(err.code(), message)
}

/// Location constraint for a new bucket; `us-east-1` must send none.
fn bucket_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    (region != US_EAST_1).then(|| {
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build()
    })
}

fn build_error(err: &aws_sdk_s3::error::BuildError) -> StorageError {
    StorageError::new(None, err.to_string())
}

#[async_trait]
impl SiteStorage for S3Storage {
    async fn create_bucket(&self, bucket: &str, region: &str) -> StorageResult<Option<String>> {
        let output = self
            .client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(bucket_configuration(region))
            .send()
            .await
            .map_err(|e| storage_error(&e))?;
        Ok(output.location().map(ToOwned::to_owned))
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        block: PublicAccessBlock,
    ) -> StorageResult<()> {
        let config = PublicAccessBlockConfiguration::builder()
            .block_public_acls(block.block_public_acls)
            .ignore_public_acls(block.ignore_public_acls)
            .block_public_policy(block.block_public_policy)
            .restrict_public_buckets(block.restrict_public_buckets)
            .build();

        self.client
            .put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(config)
            .send()
            .await
            .map_err(|e| storage_error(&e))?;
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StorageResult<()> {
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| storage_error(&e))?;
        Ok(())
    }

    async fn put_bucket_website(&self, bucket: &str, website: &WebsitePolicy) -> StorageResult<()> {
        let index = IndexDocument::builder()
            .suffix(website.index_document)
            .build()
            .map_err(|e| build_error(&e))?;
        let mut config = WebsiteConfiguration::builder().index_document(index);
        if let Some(key) = website.error_document {
            let error_document = ErrorDocument::builder()
                .key(key)
                .build()
                .map_err(|e| build_error(&e))?;
            config = config.error_document(error_document);
        }

        self.client
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(config.build())
            .send()
            .await
            .map_err(|e| storage_error(&e))?;
        Ok(())
    }

    async fn get_bucket_website(&self, bucket: &str) -> StorageResult<WebsiteStatus> {
        match self.client.get_bucket_website().bucket(bucket).send().await {
            Ok(output) => Ok(WebsiteStatus::Configured {
                index_suffix: output.index_document().map(|d| d.suffix().to_owned()),
            }),
            Err(err) if err.code() == Some(NO_SUCH_WEBSITE_CONFIGURATION) => {
                Ok(WebsiteStatus::NotConfigured)
            }
            Err(err) => Err(storage_error(&err)),
        }
    }

    async fn delete_bucket_website(&self, bucket: &str) -> StorageResult<()> {
        self.client
            .delete_bucket_website()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| storage_error(&e))?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::new(None, format!("{}: {e}", path.display())))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| storage_error(&e))?;
        Ok(())
    }
}
