//! Structured results of every operation and the single layer that prints them.
//!
//! Operations never write to the console. They return [`StepReport`]s,
//! [`UploadOutcome`]s and friends, which the binary collects into a
//! [`CommandReport`] and hands to a [`Reporter`] at the process boundary.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Serialize, Serializer};

use crate::config::OutputFormat;
use crate::error::{ErrorKind, SiteError, SiteResult};
use crate::urls::WebsiteUrls;

/// A single remote operation against the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Create the bucket.
    CreateBucket,
    /// Turn off the four public-access-block flags.
    RelaxPublicAccessBlock,
    /// Attach the public read bucket policy.
    ApplyPublicReadPolicy,
    /// Put the website configuration.
    EnableWebsiteHosting,
    /// Read the website configuration.
    GetWebsiteConfig,
    /// Delete the website configuration.
    DisableWebsiteHosting,
    /// List the build directory for per-file upload.
    Publish,
    /// Mirror the build directory through the external sync utility.
    BulkSync,
}

impl Step {
    /// Snake-case name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateBucket => "create_bucket",
            Self::RelaxPublicAccessBlock => "relax_public_access_block",
            Self::ApplyPublicReadPolicy => "apply_public_read_policy",
            Self::EnableWebsiteHosting => "enable_website_hosting",
            Self::GetWebsiteConfig => "get_website_config",
            Self::DisableWebsiteHosting => "disable_website_hosting",
            Self::Publish => "publish",
            Self::BulkSync => "bulk_sync",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one [`Step`]: a detail string on success or the error.
#[derive(Debug)]
pub struct StepReport {
    /// Which operation ran.
    pub step: Step,
    /// What happened.
    pub outcome: SiteResult<String>,
}

impl StepReport {
    /// Build a report from an operation result.
    #[must_use]
    pub fn new(step: Step, outcome: SiteResult<String>) -> Self {
        Self { step, outcome }
    }

    /// Whether the step succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Flattened `ok | error-kind + message` form shared by steps and uploads.
#[derive(Serialize)]
struct OutcomeView<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> OutcomeView<'a> {
    fn new<T>(
        result: &'a Result<T, SiteError>,
        detail: impl FnOnce(&'a T) -> Option<&'a str>,
    ) -> Self {
        match result {
            Ok(v) => Self {
                status: "ok",
                detail: detail(v),
                kind: None,
                message: None,
            },
            Err(e) => Self {
                status: "error",
                detail: None,
                kind: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}

impl Serialize for StepReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            step: Step,
            #[serde(flatten)]
            outcome: OutcomeView<'a>,
        }

        View {
            step: self.step,
            outcome: OutcomeView::new(&self.outcome, |d| Some(d.as_str())),
        }
        .serialize(serializer)
    }
}

/// Result of uploading one file.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Object key the file was sent under.
    pub key: String,
    /// Local file.
    pub path: PathBuf,
    /// Success or the upload error.
    pub result: SiteResult<()>,
}

impl Serialize for UploadOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            key: &'a str,
            path: String,
            #[serde(flatten)]
            outcome: OutcomeView<'a>,
        }

        View {
            key: &self.key,
            path: self.path.display().to_string(),
            outcome: OutcomeView::new(&self.result, |_| None),
        }
        .serialize(serializer)
    }
}

/// Per-file outcomes of one publish run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    /// Target bucket.
    pub bucket: String,
    /// Build directory that was walked.
    pub root: PathBuf,
    /// One entry per file, in walk order.
    pub uploads: Vec<UploadOutcome>,
}

impl PublishReport {
    /// Number of files uploaded successfully.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.uploads.iter().filter(|u| u.result.is_ok()).count()
    }

    /// Number of failed uploads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.uploads.len() - self.succeeded()
    }

    /// Whether every upload succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Outcome of the four provisioning steps, in execution order.
#[derive(Debug, Default, Serialize)]
pub struct ProvisionReport {
    /// Steps that ran. Shorter than four when the run was aborted.
    pub steps: Vec<StepReport>,
}

impl ProvisionReport {
    /// Whether every step that ran succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(StepReport::is_ok)
    }

    /// Reports of the failed steps.
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| !s.is_ok())
    }
}

/// Current website configuration of a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WebsiteStatus {
    /// Website hosting is on.
    Configured {
        /// Index document suffix, when the configuration has one.
        #[serde(rename = "indexSuffix")]
        index_suffix: Option<String>,
    },
    /// The bucket has no website configuration.
    NotConfigured,
}

impl fmt::Display for WebsiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured {
                index_suffix: Some(suffix),
            } => write!(f, "index document suffix: {suffix}"),
            Self::Configured { index_suffix: None } => {
                f.write_str("website configured without index document")
            }
            Self::NotConfigured => f.write_str("website configuration not found"),
        }
    }
}

/// Everything one command produced.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReport {
    /// Provisioning, inspection and sync steps.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepReport>,
    /// Per-file upload results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishReport>,
    /// Website configuration lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<WebsiteStatus>,
    /// Public URLs of the site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<WebsiteUrls>,
}

impl CommandReport {
    /// Whether every step and upload succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(StepReport::is_ok)
            && self.publish.as_ref().is_none_or(PublishReport::is_success)
    }
}

/// Renders a [`CommandReport`] as text lines or a JSON document.
#[derive(Debug)]
pub struct Reporter<W> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    /// Write the report.
    pub fn render(&mut self, report: &CommandReport) -> SiteResult<()> {
        match self.format {
            OutputFormat::Text => self.render_text(report),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, report)
                    .context("failed to serialize report")?;
                writeln!(self.out).context("failed to write report")?;
                Ok(())
            }
        }
    }

    /// Consume the reporter, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_text(&mut self, report: &CommandReport) -> SiteResult<()> {
        self.write_text(report).context("failed to write report")?;
        Ok(())
    }

    fn write_text(&mut self, report: &CommandReport) -> std::io::Result<()> {
        let out = &mut self.out;

        for step in &report.steps {
            match &step.outcome {
                Ok(detail) if detail.is_empty() => writeln!(out, "[{}] ok", step.step)?,
                Ok(detail) => writeln!(out, "[{}] ok: {detail}", step.step)?,
                Err(e) => writeln!(out, "[{}] error ({}): {e}", step.step, e.kind())?,
            }
        }

        if let Some(publish) = &report.publish {
            for upload in &publish.uploads {
                match &upload.result {
                    Ok(()) => writeln!(
                        out,
                        "uploaded {} to {}/{}",
                        upload.path.display(),
                        publish.bucket,
                        upload.key
                    )?,
                    Err(e) => writeln!(out, "error uploading {}: {e}", upload.path.display())?,
                }
            }
            writeln!(
                out,
                "published {} of {} files from {} to {}",
                publish.succeeded(),
                publish.uploads.len(),
                publish.root.display(),
                publish.bucket
            )?;
        }

        if let Some(website) = &report.website {
            writeln!(out, "{website}")?;
        }

        if let Some(urls) = &report.urls {
            writeln!(out, "{}", urls.dash_style)?;
            writeln!(out, "{}", urls.dot_style)?;
        }

        Ok(())
    }
}
