use url::Url;

use crate::error::{Error, Result};

pub fn is_http_url(input: &str) -> bool {
    input.starts_with("https://") || input.starts_with("http://")
}

/// Serve URL of a site deployed into `bucket_name`; URLs are passed through.
pub fn convert_to_serve_url(url_or_id: &str, bucket_name: &str) -> String {
    if is_http_url(url_or_id) {
        return url_or_id.to_string();
    }
    format!("https://storage.googleapis.com/{bucket_name}/sites/{url_or_id}/index.html")
}

pub fn validate_serve_url(serve_url: &str) -> Result<Url> {
    let invalid = || Error::InvalidServeUrl {
        url: serve_url.to_string(),
    };
    let parsed = Url::parse(serve_url).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(parsed),
        _ => Err(invalid()),
    }
}
