//! Provisioning integration tests.

#[cfg(test)]
mod tests {
    use bucketsite_core::{ErrorKind, Step};
    use bucketsite_deploy::BucketProvisioner;
    use serde_json::json;

    use crate::{cleanup_bucket, storage, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_provision_public_website_bucket() {
        let storage = storage().await;
        let client = storage.client().clone();
        let bucket = test_bucket_name("provision");

        let report = BucketProvisioner::new(storage, "us-east-1")
            .provision(&bucket)
            .await;

        let steps: Vec<Step> = report.steps.iter().map(|s| s.step).collect();
        assert_eq!(
            steps,
            vec![
                Step::CreateBucket,
                Step::RelaxPublicAccessBlock,
                Step::ApplyPublicReadPolicy,
                Step::EnableWebsiteHosting,
            ]
        );
        assert!(report.is_success(), "{report:?}");

        let pab = client
            .get_public_access_block()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_public_access_block");
        let conf = pab
            .public_access_block_configuration()
            .expect("configuration");
        assert_eq!(conf.block_public_acls(), Some(false));
        assert_eq!(conf.ignore_public_acls(), Some(false));
        assert_eq!(conf.block_public_policy(), Some(false));
        assert_eq!(conf.restrict_public_buckets(), Some(false));

        let policy = client
            .get_bucket_policy()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_policy");
        let doc: serde_json::Value =
            serde_json::from_str(policy.policy().expect("policy")).expect("policy json");
        assert_eq!(
            doc["Statement"][0]["Resource"],
            json!([format!("arn:aws:s3:::{bucket}/*")])
        );
        assert_eq!(doc["Statement"][0]["Action"], json!(["s3:GetObject"]));

        let website = client
            .get_bucket_website()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_website");
        assert_eq!(
            website.index_document().map(|d| d.suffix()),
            Some("index.html")
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_rerun_configuration_steps_on_existing_bucket() {
        let storage = storage().await;
        let client = storage.client().clone();
        let bucket = test_bucket_name("rerun");
        let provisioner = BucketProvisioner::new(storage, "us-east-1");

        assert!(provisioner.provision(&bucket).await.is_success());
        let second = provisioner.provision(&bucket).await;

        // Creation may or may not be rejected for a bucket we already own;
        // the configuration steps must succeed either way.
        assert_eq!(second.steps.len(), 4);
        assert!(second.steps[1..].iter().all(|s| s.is_ok()), "{second:?}");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_report_errors_for_missing_bucket() {
        let storage = storage().await;
        let bucket = test_bucket_name("missing");
        let provisioner = BucketProvisioner::new(storage, "us-east-1");

        let err = provisioner
            .apply_public_read_policy(&bucket)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyApplicationError);

        let err = provisioner
            .enable_website_hosting(&bucket)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WebsiteConfigError);
    }
}
