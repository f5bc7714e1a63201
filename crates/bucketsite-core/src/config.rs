//! Deployment configuration.
//!
//! Provides [`SiteConfig`], loaded from environment variables and then
//! optionally overridden by command-line flags in the binary.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{SiteError, SiteResult};
use crate::types::{DeploymentTarget, Mode};

/// What the provisioner does after a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep running the remaining steps; each later failure is recorded.
    #[default]
    Continue,
    /// Stop at the first failed step.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("continue") {
            Ok(Self::Continue)
        } else if s.eq_ignore_ascii_case("abort") {
            Ok(Self::Abort)
        } else {
            Err(SiteError::Config(format!(
                "unknown failure policy {s:?} (expected \"continue\" or \"abort\")"
            )))
        }
    }
}

/// How reports are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable status lines.
    #[default]
    Text,
    /// One JSON document per command.
    Json,
}

impl FromStr for OutputFormat {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(Self::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(SiteError::Config(format!(
                "unknown output format {s:?} (expected \"text\" or \"json\")"
            )))
        }
    }
}

/// Deployment configuration.
///
/// # Examples
///
/// ```
/// use bucketsite_core::{Mode, SiteConfig};
///
/// let config = SiteConfig::default();
/// assert_eq!(config.bucket, "bucket-web-2024");
/// assert_eq!(config.mode, Mode::Mock);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Target bucket name.
    #[builder(default = String::from(SiteConfig::DEFAULT_BUCKET))]
    pub bucket: String,

    /// Region of the bucket.
    #[builder(default = String::from(SiteConfig::DEFAULT_REGION))]
    pub region: String,

    /// Live or mock endpoint.
    #[builder(default)]
    pub mode: Mode,

    /// Local directory holding the built site.
    #[builder(default = PathBuf::from("dist"))]
    pub build_dir: PathBuf,

    /// Optional prefix prepended to every object key.
    #[builder(default)]
    pub key_prefix: Option<String>,

    /// Provisioning behavior after a failed step.
    #[builder(default)]
    pub failure_policy: FailurePolicy,

    /// Report rendering.
    #[builder(default)]
    pub output: OutputFormat,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SiteConfig {
    /// Bucket used when none is configured.
    pub const DEFAULT_BUCKET: &str = "bucket-web-2024";

    /// Region used when none is configured.
    pub const DEFAULT_REGION: &str = "us-east-1";

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SITE_BUCKET` | `bucket-web-2024` |
    /// | `SITE_REGION` (then `AWS_REGION`) | `us-east-1` |
    /// | `SITE_MODE` | `mock` |
    /// | `SITE_BUILD_DIR` | `dist` |
    /// | `SITE_KEY_PREFIX` | *(unset)* |
    /// | `SITE_FAILURE_POLICY` | `continue` |
    /// | `SITE_OUTPUT` | `text` |
    /// | `LOG_LEVEL` | `info` |
    pub fn from_env() -> SiteResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SiteResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("SITE_BUCKET") {
            config.bucket = v;
        }
        if let Some(v) = lookup("SITE_REGION").or_else(|| lookup("AWS_REGION")) {
            config.region = v;
        }
        if let Some(v) = lookup("SITE_MODE") {
            config.mode = v.parse()?;
        }
        if let Some(v) = lookup("SITE_BUILD_DIR") {
            config.build_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SITE_KEY_PREFIX") {
            config.key_prefix = Some(v).filter(|p| !p.is_empty());
        }
        if let Some(v) = lookup("SITE_FAILURE_POLICY") {
            config.failure_policy = v.parse()?;
        }
        if let Some(v) = lookup("SITE_OUTPUT") {
            config.output = v.parse()?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// The immutable deployment target for this run.
    #[must_use]
    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget::new(&self.bucket, &self.region, self.mode)
    }
}
