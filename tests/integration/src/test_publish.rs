//! Publishing integration tests.

#[cfg(test)]
mod tests {
    use bucketsite_core::ErrorKind;
    use bucketsite_deploy::{BucketProvisioner, SitePublisher};

    use crate::{cleanup_bucket, site_dir, storage, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_publish_build_directory() {
        let storage = storage().await;
        let client = storage.client().clone();
        let bucket = test_bucket_name("publish");
        let dir = site_dir();

        assert!(
            BucketProvisioner::new(storage.clone(), "us-east-1")
                .provision(&bucket)
                .await
                .is_success()
        );
        let report = SitePublisher::new(storage, &bucket)
            .publish(dir.path())
            .await
            .expect("publish");

        assert!(report.is_success(), "{report:?}");
        assert_eq!(report.uploads.len(), 3);

        let listed = client
            .list_objects_v2()
            .bucket(&bucket)
            .send()
            .await
            .expect("list_objects_v2");
        let mut keys: Vec<&str> = listed.contents().iter().filter_map(|o| o.key()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["css/site.css", "error.html", "index.html"]);

        let index = client
            .get_object()
            .bucket(&bucket)
            .key("index.html")
            .send()
            .await
            .expect("get_object");
        assert_eq!(index.content_type(), Some("text/html; charset=utf-8"));
        let body = index.body.collect().await.expect("body").into_bytes();
        assert_eq!(body.as_ref(), b"<h1>home</h1>");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_report_every_file_when_bucket_is_missing() {
        let storage = storage().await;
        let bucket = test_bucket_name("nobucket");
        let dir = site_dir();

        let report = SitePublisher::new(storage, &bucket)
            .publish(dir.path())
            .await
            .expect("publish");

        assert_eq!(report.uploads.len(), 3);
        assert_eq!(report.failed(), 3);
        assert!(
            report
                .uploads
                .iter()
                .all(|u| u.result.as_ref().is_err_and(|e| e.kind() == ErrorKind::UploadError))
        );
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_publish_under_key_prefix() {
        let storage = storage().await;
        let client = storage.client().clone();
        let bucket = test_bucket_name("prefix");
        let dir = site_dir();

        BucketProvisioner::new(storage.clone(), "us-east-1")
            .create_bucket(&bucket)
            .await
            .expect("create_bucket");
        let report = SitePublisher::new(storage, &bucket)
            .with_key_prefix(Some("v2".to_owned()))
            .publish(dir.path())
            .await
            .expect("publish");
        assert!(report.is_success());

        let head = client
            .head_object()
            .bucket(&bucket)
            .key("v2/css/site.css")
            .send()
            .await
            .expect("head_object");
        assert_eq!(head.content_type(), Some("text/css; charset=utf-8"));

        cleanup_bucket(&client, &bucket).await;
    }
}
