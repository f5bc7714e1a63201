//! Command-line interface.
//!
//! Flags override the values loaded from the environment by
//! [`SiteConfig::from_env`].

use std::path::PathBuf;

use bucketsite_core::{FailurePolicy, Mode, OutputFormat, SiteConfig};
use clap::{Parser, Subcommand};

/// Provision an S3 bucket for static website hosting and publish a site to it.
#[derive(Debug, Parser)]
#[command(name = "bucketsite", version, about)]
pub struct Cli {
    /// Target bucket [env: SITE_BUCKET]
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Bucket region [env: SITE_REGION]
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// `live` or `mock` [env: SITE_MODE]
    #[arg(long, global = true)]
    pub mode: Option<Mode>,

    /// Local build directory [env: SITE_BUILD_DIR]
    #[arg(long, global = true)]
    pub build_dir: Option<PathBuf>,

    /// Prefix for every object key [env: SITE_KEY_PREFIX]
    #[arg(long, global = true)]
    pub key_prefix: Option<String>,

    /// `continue` or `abort` after a failed provisioning step [env: SITE_FAILURE_POLICY]
    #[arg(long, global = true)]
    pub failure_policy: Option<FailurePolicy>,

    /// `text` or `json` [env: SITE_OUTPUT]
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Tracing filter [env: LOG_LEVEL]
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Provision the bucket, publish the build directory and print the URLs.
    Deploy {
        /// Upload with the `aws` CLI instead of one request per file.
        #[arg(long)]
        bulk: bool,
        /// With --bulk, use `aws s3 sync` instead of `aws s3 cp --recursive`.
        #[arg(long, requires = "bulk")]
        mirror: bool,
    },
    /// Create the bucket, open it for public reads and enable website hosting.
    Provision,
    /// Upload every file of the build directory.
    Publish,
    /// Upload the build directory with the `aws` CLI.
    Sync {
        /// Use `aws s3 sync` instead of `aws s3 cp --recursive`.
        #[arg(long)]
        mirror: bool,
    },
    /// Inspect or remove the website configuration.
    Website {
        /// Action.
        #[command(subcommand)]
        action: WebsiteAction,
    },
    /// Print the website URLs of the bucket.
    Urls,
}

/// `website` actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum WebsiteAction {
    /// Show the current website configuration.
    Get,
    /// Delete the website configuration.
    Delete,
}

impl Cli {
    /// Overlay the flags that were given on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: SiteConfig) -> SiteConfig {
        if let Some(v) = &self.bucket {
            config.bucket.clone_from(v);
        }
        if let Some(v) = &self.region {
            config.region.clone_from(v);
        }
        if let Some(v) = self.mode {
            config.mode = v;
        }
        if let Some(v) = &self.build_dir {
            config.build_dir.clone_from(v);
        }
        if let Some(v) = &self.key_prefix {
            config.key_prefix = Some(v.clone()).filter(|p| !p.is_empty());
        }
        if let Some(v) = self.failure_policy {
            config.failure_policy = v;
        }
        if let Some(v) = self.output {
            config.output = v;
        }
        if let Some(v) = &self.log_level {
            config.log_level.clone_from(v);
        }
        config
    }
}
