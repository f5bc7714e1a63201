//! Access policy and content-type templates applied to the site bucket.

use std::path::Path;

use serde_json::json;

/// Bucket policy granting anonymous `s3:GetObject` on every object in `bucket`.
///
/// The document depends on the bucket name only, so applying it twice is a
/// no-op from the service's point of view.
#[must_use]
pub fn public_read_policy(bucket: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "PublicReadGetObject",
            "Effect": "Allow",
            "Principal": "*",
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }],
    })
    .to_string()
}

/// Content type sent with an uploaded object, guessed from its extension.
#[must_use]
pub fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let mime = match ext.as_deref() {
        Some("html" | "htm") => mime::TEXT_HTML_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("js" | "mjs") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("json" | "map") => mime::APPLICATION_JSON,
        Some("svg") => mime::IMAGE_SVG,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("txt") => mime::TEXT_PLAIN_UTF_8,
        Some("xml") => mime::TEXT_XML,
        Some("woff") => mime::FONT_WOFF,
        Some("woff2") => mime::FONT_WOFF2,
        Some("ico") => return "image/x-icon".to_owned(),
        Some("wasm") => return "application/wasm".to_owned(),
        _ => mime::APPLICATION_OCTET_STREAM,
    };
    mime.to_string()
}
