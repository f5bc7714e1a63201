//! Endpoint and credential selection.
//!
//! [`ClientConfig::resolve`] is a pure function of the deployment mode and
//! whatever static credentials the environment carries. Mock mode always
//! points at the local emulator; live mode leaves routing to the SDK.

use serde::Serialize;

use crate::types::{DeploymentTarget, Mode};

/// Fixed URL of the local storage emulator used in mock mode.
pub const EMULATOR_ENDPOINT: &str = "http://s3.localhost.localstack.cloud:4566";

/// Region the emulator is always addressed with.
pub const EMULATOR_REGION: &str = "us-east-1";

/// Dummy key pair accepted by the emulator.
const EMULATOR_ACCESS_KEY: &str = "test";
const EMULATOR_SECRET_KEY: &str = "test";

/// Access key pair read from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

impl StaticCredentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Read both credential variables; `None` unless both are set and non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return None;
        }
        Some(Self::new(access_key_id, secret_access_key))
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Everything needed to build a storage client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Region requests are signed for.
    pub region: String,
    /// Explicit credentials; `None` means the SDK default chain.
    #[serde(skip)]
    pub credentials: Option<StaticCredentials>,
    /// Endpoint replacing the default service endpoint.
    pub endpoint_override: Option<String>,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    pub force_path_style: bool,
}

impl ClientConfig {
    /// Derive the client configuration for `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketsite_core::{ClientConfig, DeploymentTarget, Mode, EMULATOR_ENDPOINT};
    ///
    /// let target = DeploymentTarget::new("site", "eu-west-1", Mode::Mock);
    /// let config = ClientConfig::resolve(&target, None);
    /// assert_eq!(config.endpoint_override.as_deref(), Some(EMULATOR_ENDPOINT));
    /// assert_eq!(config.region, "us-east-1");
    /// ```
    #[must_use]
    pub fn resolve(target: &DeploymentTarget, credentials: Option<StaticCredentials>) -> Self {
        match target.mode() {
            Mode::Mock => Self {
                region: EMULATOR_REGION.to_owned(),
                credentials: Some(credentials.unwrap_or_else(|| {
                    StaticCredentials::new(EMULATOR_ACCESS_KEY, EMULATOR_SECRET_KEY)
                })),
                endpoint_override: Some(EMULATOR_ENDPOINT.to_owned()),
                force_path_style: true,
            },
            Mode::Live => Self {
                region: target.region().to_owned(),
                credentials,
                endpoint_override: None,
                force_path_style: false,
            },
        }
    }

    /// Resolve using the credential variables of the current process.
    #[must_use]
    pub fn from_env(target: &DeploymentTarget) -> Self {
        Self::resolve(target, StaticCredentials::from_env())
    }
}
