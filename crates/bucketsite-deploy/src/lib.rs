//! Bucket provisioning and site publishing for bucketsite.
//!
//! # Architecture
//!
//! ```text
//! BucketProvisioner   SitePublisher      BulkSync
//!        |                  |               |
//!        v                  v               v
//!    SiteStorage (trait) ------------    `aws s3` CLI
//!        |
//!        v
//!    S3Storage (aws-sdk-s3, live or emulator endpoint)
//! ```

mod provisioner;
mod publisher;
mod s3;
mod storage;
mod sync;
#[cfg(test)]
mod testing;

pub use provisioner::BucketProvisioner;
pub use publisher::SitePublisher;
pub use s3::{S3Storage, build_client};
pub use storage::{SiteStorage, StorageError, StorageResult};
pub use sync::{BulkSync, SyncStrategy};
