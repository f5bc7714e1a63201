//! Static-website endpoint URLs.

use serde::Serialize;

/// Both historically valid website endpoint forms for a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteUrls {
    /// `http://<bucket>.s3-website-<region>.amazonaws.com`
    pub dash_style: String,
    /// `http://<bucket>.s3-website.<region>.amazonaws.com`
    pub dot_style: String,
}

/// Build the website URLs of `bucket` in `region`. No network access.
///
/// # Examples
///
/// ```
/// let urls = bucketsite_core::render_urls("site", "us-east-1");
/// assert_eq!(urls.dash_style, "http://site.s3-website-us-east-1.amazonaws.com");
/// assert_eq!(urls.dot_style, "http://site.s3-website.us-east-1.amazonaws.com");
/// ```
#[must_use]
pub fn render_urls(bucket: &str, region: &str) -> WebsiteUrls {
    WebsiteUrls {
        dash_style: format!("http://{bucket}.s3-website-{region}.amazonaws.com"),
        dot_style: format!("http://{bucket}.s3-website.{region}.amazonaws.com"),
    }
}
