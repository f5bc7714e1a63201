//! Data model shared by the provisioner, the publisher and the reporter.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Which storage endpoint a run targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The real cloud storage endpoint, with default SDK routing.
    Live,
    /// A local storage emulator (LocalStack-compatible).
    #[default]
    Mock,
}

impl Mode {
    /// Lowercase name of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for Mode {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("live") {
            Ok(Self::Live)
        } else if s.eq_ignore_ascii_case("mock") {
            Ok(Self::Mock)
        } else {
            Err(SiteError::Config(format!(
                "unknown mode {s:?} (expected \"live\" or \"mock\")"
            )))
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The bucket a run deploys to. Built once from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTarget {
    bucket_name: String,
    region: String,
    mode: Mode,
}

impl DeploymentTarget {
    /// Create a new deployment target.
    #[must_use]
    pub fn new(bucket_name: impl Into<String>, region: impl Into<String>, mode: Mode) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: region.into(),
            mode,
        }
    }

    /// Globally unique, DNS-compatible bucket name.
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Region the bucket lives in.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Live or mock endpoint.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// One regular file to upload and the object key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadTask {
    /// Path of the file on disk.
    pub absolute_path: PathBuf,
    /// Object key: the path relative to the build root, joined with `/`.
    pub relative_key: String,
}

impl FileUploadTask {
    /// Build a task for `path`, deriving the key from its position under `root`.
    ///
    /// The key is used verbatim; components that are not valid UTF-8 are
    /// converted lossily and nothing else is rewritten.
    pub fn new(root: &Path, path: PathBuf, prefix: Option<&str>) -> Result<Self, SiteError> {
        let relative = path.strip_prefix(root).map_err(|_| SiteError::Filesystem {
            path: path.clone(),
            message: format!("not under build root {}", root.display()),
        })?;

        let mut parts: Vec<String> = Vec::new();
        if let Some(prefix) = prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
            parts.push(prefix.to_owned());
        }
        for component in relative.components() {
            if let Component::Normal(part) = component {
                parts.push(part.to_string_lossy().into_owned());
            }
        }

        Ok(Self {
            absolute_path: path,
            relative_key: parts.join("/"),
        })
    }
}

/// Website hosting settings applied to the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsitePolicy {
    /// Document served for directory-style paths.
    pub index_document: &'static str,
    /// Document served on errors. Never configured.
    pub error_document: Option<&'static str>,
}

impl WebsitePolicy {
    /// Index document name.
    pub const INDEX_DOCUMENT: &str = "index.html";
}

impl Default for WebsitePolicy {
    fn default() -> Self {
        Self {
            index_document: Self::INDEX_DOCUMENT,
            error_document: None,
        }
    }
}

/// The four bucket-level public-access-block flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct PublicAccessBlock {
    /// Reject requests that carry public ACLs.
    pub block_public_acls: bool,
    /// Ignore public ACLs on the bucket and its objects.
    pub ignore_public_acls: bool,
    /// Reject bucket policies that grant public access.
    pub block_public_policy: bool,
    /// Restrict access to buckets with public policies.
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// All four flags off, so a public policy can take effect.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            block_public_acls: false,
            ignore_public_acls: false,
            block_public_policy: false,
            restrict_public_buckets: false,
        }
    }
}
