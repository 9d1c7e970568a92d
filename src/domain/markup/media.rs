//! Image URL fixes applied to authored markdown before rendering.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static IMGUR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"imgur\.com/(?:a/)?([a-zA-Z0-9]+)").unwrap());

static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").unwrap());

/// Rewrites imgur page and album links to a direct image URL.
///
/// `https://imgur.com/abc123` and `https://imgur.com/a/abc123` become
/// `https://i.imgur.com/abc123.jpg`. Direct `i.imgur.com` links and
/// non-imgur URLs are returned unchanged.
pub fn normalize_image_url(url: &str) -> String {
    if url.contains("i.imgur.com") {
        return url.to_string();
    }

    match IMGUR_ID.captures(url) {
        Some(caps) => format!("https://i.imgur.com/{}.jpg", &caps[1]),
        None => url.to_string(),
    }
}

/// Applies [`normalize_image_url`] to every `![alt](url)` in `markdown`.
pub fn rewrite_markdown_images(markdown: &str) -> String {
    MARKDOWN_IMAGE
        .replace_all(markdown, |caps: &Captures| {
            format!("![{}]({})", &caps[1], normalize_image_url(&caps[2]))
        })
        .into_owned()
}
