//! Integration tests for bucketsite against an S3 emulator.
//!
//! These tests require an S3-compatible server (LocalStack or similar) at
//! `localhost:4566`. They are marked `#[ignore]` so they don't run during
//! normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p bucketsite-integration -- --ignored
//! ```

use std::path::Path;
use std::sync::Once;

use bucketsite_core::{ClientConfig, DeploymentTarget, Mode};
use bucketsite_deploy::S3Storage;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the emulator.
fn endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Mock-mode client configuration aimed at [`endpoint_url`].
#[must_use]
pub fn client_config() -> ClientConfig {
    init_tracing();

    let target = DeploymentTarget::new("unused", "us-east-1", Mode::Mock);
    let mut config = ClientConfig::resolve(&target, None);
    config.endpoint_override = Some(endpoint_url());
    config
}

/// Storage backed by the emulator.
pub async fn storage() -> S3Storage {
    S3Storage::connect(&client_config()).await
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// A small build directory: `index.html`, `error.html` and `css/site.css`.
#[must_use]
pub fn site_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "index.html", "<h1>home</h1>");
    write(dir.path(), "error.html", "<h1>oops</h1>");
    write(dir.path(), "css/site.css", "body { margin: 0 }");
    dir
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dir");
    }
    std::fs::write(path, body).expect("write file");
}

/// Delete all objects in a bucket, then delete the bucket.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    let mut continuation_token = None;
    loop {
        let mut req = client.list_objects_v2().bucket(bucket);
        if let Some(token) = continuation_token.take() {
            req = req.continuation_token(token);
        }
        let Ok(resp) = req.send().await else {
            return; // Bucket may not exist.
        };

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                let _ = client.delete_object().bucket(bucket).key(key).send().await;
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
        } else {
            break;
        }
    }

    let _ = client.delete_bucket().bucket(bucket).send().await;
}

mod test_deploy;
mod test_publish;
mod test_website;
