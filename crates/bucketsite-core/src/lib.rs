//! Core types, configuration and reporting for bucketsite.
//!
//! This crate holds everything that does not talk to the storage service:
//! the deployment configuration, the endpoint resolver, the directory walker
//! that feeds the publisher, the bucket policy template, website URL
//! rendering, and the structured reports every operation returns.

mod config;
mod endpoint;
mod error;
mod policy;
mod report;
mod types;
mod urls;
mod walker;

pub use config::{FailurePolicy, OutputFormat, SiteConfig};
pub use endpoint::{ClientConfig, EMULATOR_ENDPOINT, EMULATOR_REGION, StaticCredentials};
pub use error::{ErrorKind, SiteError, SiteResult};
pub use policy::{content_type_for, public_read_policy};
pub use report::{
    CommandReport, ProvisionReport, PublishReport, Reporter, Step, StepReport, UploadOutcome,
    WebsiteStatus,
};
pub use types::{DeploymentTarget, FileUploadTask, Mode, PublicAccessBlock, WebsitePolicy};
pub use urls::{WebsiteUrls, render_urls};
pub use walker::{list_files, upload_tasks};
