//! Website configuration integration tests.

#[cfg(test)]
mod tests {
    use bucketsite_core::{ErrorKind, WebsiteStatus};
    use bucketsite_deploy::BucketProvisioner;

    use crate::{cleanup_bucket, storage, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_get_and_delete_website_config() {
        let storage = storage().await;
        let client = storage.client().clone();
        let bucket = test_bucket_name("website");
        let provisioner = BucketProvisioner::new(storage, "us-east-1");

        provisioner.create_bucket(&bucket).await.expect("create");
        assert_eq!(
            provisioner.website_config(&bucket).await.expect("get"),
            WebsiteStatus::NotConfigured
        );

        provisioner
            .enable_website_hosting(&bucket)
            .await
            .expect("enable");
        assert_eq!(
            provisioner.website_config(&bucket).await.expect("get"),
            WebsiteStatus::Configured {
                index_suffix: Some("index.html".to_owned())
            }
        );

        provisioner
            .disable_website_hosting(&bucket)
            .await
            .expect("delete");
        assert_eq!(
            provisioner.website_config(&bucket).await.expect("get"),
            WebsiteStatus::NotConfigured
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_fail_website_lookup_for_missing_bucket() {
        let storage = storage().await;
        let bucket = test_bucket_name("ghost");
        let provisioner = BucketProvisioner::new(storage, "us-east-1");

        let err = provisioner.website_config(&bucket).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WebsiteConfigError);
    }
}
