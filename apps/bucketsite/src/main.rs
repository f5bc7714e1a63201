//! bucketsite - publish a static site to an S3 website bucket.
//!
//! # Usage
//!
//! ```text
//! SITE_BUCKET=my-site SITE_MODE=live bucketsite deploy
//! bucketsite --mode mock --build-dir dist publish
//! bucketsite website get
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SITE_BUCKET` | `bucket-web-2024` | Target bucket |
//! | `SITE_REGION` | `us-east-1` | Bucket region (falls back to `AWS_REGION`) |
//! | `SITE_MODE` | `mock` | `live` or `mock` (LocalStack at port 4566) |
//! | `SITE_BUILD_DIR` | `dist` | Directory to publish |
//! | `SITE_KEY_PREFIX` | *(unset)* | Object key prefix |
//! | `SITE_FAILURE_POLICY` | `continue` | `continue` or `abort` |
//! | `SITE_OUTPUT` | `text` | `text` or `json` |
//! | `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` | *(unset)* | Static credentials |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! The report goes to stdout, logs to stderr. The exit code is 1 when any
//! step or upload failed.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use bucketsite_core::{
    ClientConfig, CommandReport, Reporter, SiteConfig, Step, StepReport, render_urls,
};
use bucketsite_deploy::{BucketProvisioner, BulkSync, S3Storage, SitePublisher, SyncStrategy};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, WebsiteAction};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn strategy(mirror: bool) -> SyncStrategy {
    if mirror {
        SyncStrategy::Mirror
    } else {
        SyncStrategy::Copy
    }
}

/// Execute one command and collect everything it produced.
async fn run(command: &Command, config: &SiteConfig) -> CommandReport {
    let target = config.target();
    let client = ClientConfig::from_env(&target);
    let bucket = target.bucket_name();
    let mut report = CommandReport::default();

    if let Command::Urls = command {
        report.urls = Some(render_urls(bucket, &client.region));
        return report;
    }

    info!(
        bucket = %bucket,
        mode = %target.mode(),
        endpoint = client.endpoint_override.as_deref().unwrap_or("default"),
        "resolved storage endpoint"
    );
    let storage = S3Storage::connect(&client).await;
    let provisioner = BucketProvisioner::for_client(storage.clone(), &client)
        .with_failure_policy(config.failure_policy);
    let publisher =
        SitePublisher::new(storage, bucket).with_key_prefix(config.key_prefix.clone());

    match command {
        Command::Deploy { bulk, mirror } => {
            report.steps = provisioner.provision(bucket).await.steps;
            if *bulk {
                let outcome = BulkSync::new(&config.build_dir, bucket, client.clone())
                    .with_strategy(strategy(*mirror))
                    .run()
                    .await;
                report.steps.push(StepReport::new(Step::BulkSync, outcome));
            } else {
                publish_into(&mut report, &publisher, config).await;
            }
            report.urls = Some(render_urls(bucket, &client.region));
        }
        Command::Provision => {
            report.steps = provisioner.provision(bucket).await.steps;
        }
        Command::Publish => {
            publish_into(&mut report, &publisher, config).await;
        }
        Command::Sync { mirror } => {
            let outcome = BulkSync::new(&config.build_dir, bucket, client)
                .with_strategy(strategy(*mirror))
                .run()
                .await;
            report.steps.push(StepReport::new(Step::BulkSync, outcome));
        }
        Command::Website {
            action: WebsiteAction::Get,
        } => match provisioner.website_config(bucket).await {
            Ok(status) => report.website = Some(status),
            Err(e) => report
                .steps
                .push(StepReport::new(Step::GetWebsiteConfig, Err(e))),
        },
        Command::Website {
            action: WebsiteAction::Delete,
        } => {
            let outcome = provisioner.disable_website_hosting(bucket).await;
            report
                .steps
                .push(StepReport::new(Step::DisableWebsiteHosting, outcome));
        }
        Command::Urls => {}
    }

    report
}

/// Publish the build directory; a listing failure becomes an upload-less report entry.
async fn publish_into(
    report: &mut CommandReport,
    publisher: &SitePublisher<S3Storage>,
    config: &SiteConfig,
) {
    match publisher.publish(&config.build_dir).await {
        Ok(publish) => report.publish = Some(publish),
        Err(e) => report.steps.push(StepReport::new(Step::Publish, Err(e))),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.apply(SiteConfig::from_env().context("invalid configuration")?);

    init_tracing(&config.log_level)?;

    info!(
        bucket = %config.bucket,
        region = %config.region,
        mode = %config.mode,
        version = env!("CARGO_PKG_VERSION"),
        "starting bucketsite",
    );

    let report = run(&cli.command, &config).await;

    let mut reporter = Reporter::new(config.output, std::io::stdout().lock());
    reporter.render(&report)?;

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
