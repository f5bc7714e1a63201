//! Bulk upload through the `aws` command-line tool.
//!
//! An alternative to [`crate::SitePublisher`]: one `aws s3 cp --recursive`
//! (or `aws s3 sync`) invocation mirrors the whole build directory. What
//! counts as changed and whether removed files are deleted is up to the tool.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use bucketsite_core::{ClientConfig, SiteError, SiteResult};
use tokio::process::Command;
use tracing::{info, warn};

/// Which `aws s3` subcommand performs the transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStrategy {
    /// `aws s3 cp <root> s3://<bucket>/ --recursive`: copy every file.
    #[default]
    Copy,
    /// `aws s3 sync <root> s3://<bucket>/`: copy files that changed.
    Mirror,
}

/// A single invocation of the external sync tool.
#[derive(Debug, Clone)]
pub struct BulkSync {
    program: OsString,
    root: PathBuf,
    bucket: String,
    client: ClientConfig,
    strategy: SyncStrategy,
}

impl BulkSync {
    /// Default executable.
    pub const PROGRAM: &str = "aws";

    /// Prepare a sync of `root` into `bucket` using the endpoint and
    /// credentials of `client`.
    pub fn new(root: impl AsRef<Path>, bucket: impl Into<String>, client: ClientConfig) -> Self {
        Self {
            program: OsString::from(Self::PROGRAM),
            root: root.as_ref().to_path_buf(),
            bucket: bucket.into(),
            client,
            strategy: SyncStrategy::default(),
        }
    }

    /// Choose the transfer subcommand.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run a different executable instead of `aws`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments passed to the tool.
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["s3".into()];
        match self.strategy {
            SyncStrategy::Copy => args.push("cp".into()),
            SyncStrategy::Mirror => args.push("sync".into()),
        }
        args.push(self.root.clone().into_os_string());
        args.push(format!("s3://{}/", self.bucket).into());
        if self.strategy == SyncStrategy::Copy {
            args.push("--recursive".into());
        }
        if let Some(endpoint) = &self.client.endpoint_override {
            args.push(format!("--endpoint-url={endpoint}").into());
        }
        args
    }

    /// Run the tool and return its standard output.
    pub async fn run(&self) -> SiteResult<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args())
            .env("AWS_DEFAULT_REGION", &self.client.region)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(creds) = &self.client.credentials {
            cmd.env("AWS_ACCESS_KEY_ID", &creds.access_key_id)
                .env("AWS_SECRET_ACCESS_KEY", &creds.secret_access_key);
        }

        info!(
            program = %self.program.to_string_lossy(),
            bucket = %self.bucket,
            root = %self.root.display(),
            "running bulk sync"
        );
        let output = cmd.output().await.map_err(|e| {
            SiteError::Sync(format!(
                "failed to run {}: {e}",
                self.program.to_string_lossy()
            ))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "bulk sync failed");
            return Err(SiteError::Sync(format!(
                "{} exited with {}: {}",
                self.program.to_string_lossy(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(stdout)
    }
}
