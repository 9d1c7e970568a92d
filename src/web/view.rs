//! View models handed to templates.
//!
//! Templates only see preformatted strings, so date formatting, media
//! selection and URL building live here.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use crate::api::dto::content::ContentRequest;
use crate::domain::entities::{ContentItem, ContentKind, Media};
use crate::domain::markup::media::{normalize_image_url, rewrite_markdown_images};
use crate::domain::repositories::ContentCounts;
use crate::domain::visibility::PublicationStatus;
use crate::error::AppError;

/// Format of `<input type="datetime-local">` values.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// `October 17, 2026`
pub fn display_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Link to a listing filtered by `tag`.
pub fn tag_href(kind: ContentKind, tag: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(tag.as_bytes()).collect();
    format!("/{}?tag={}", kind.section(), encoded)
}

/// A tag chip with its filter link.
pub struct TagLink {
    pub name: String,
    pub href: String,
    pub active: bool,
}

impl TagLink {
    pub fn list(kind: ContentKind, tags: Vec<String>, active: Option<&str>) -> Vec<TagLink> {
        tags.into_iter()
            .map(|name| TagLink {
                href: tag_href(kind, &name),
                active: active.is_some_and(|a| a.eq_ignore_ascii_case(&name)),
                name,
            })
            .collect()
    }
}

/// Summary of an item for listings, the home page and related links.
pub struct ItemCard {
    pub title: String,
    pub path: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<TagLink>,
}

impl ItemCard {
    pub fn from_item(item: &ContentItem) -> Self {
        ItemCard {
            title: item.title.clone(),
            path: item.path(),
            description: item.description.clone(),
            date: item.published_at.map(display_date),
            image_url: item.image_url.as_deref().map(normalize_image_url),
            tags: TagLink::list(item.kind, item.tag_list(), None),
        }
    }
}

/// Full item for the detail page.
pub struct ItemView {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub iso_date: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Vec<TagLink>,
    /// Markdown source, rendered in the browser.
    pub body: Option<String>,
}

impl ItemView {
    pub fn from_item(item: &ContentItem) -> Self {
        let (image_url, video_url) = match item.media() {
            Some(Media::Image(url)) => (Some(normalize_image_url(&url)), None),
            Some(Media::Video(url)) => (None, Some(url)),
            None => (None, None),
        };

        ItemView {
            title: item.title.clone(),
            description: item.description.clone(),
            date: item.published_at.map(display_date),
            iso_date: item.published_at.map(|t| t.to_rfc3339()),
            image_url,
            video_url,
            tags: TagLink::list(item.kind, item.tag_list(), None),
            body: item.content.as_deref().map(rewrite_markdown_images),
        }
    }
}

/// Home page block: the newest items of one kind.
pub struct SectionPreview {
    pub label: &'static str,
    pub section: &'static str,
    pub items: Vec<ItemCard>,
}

/// Admin table row.
pub struct AdminRow {
    pub id: i64,
    pub title: String,
    pub path: String,
    pub status: &'static str,
    pub status_class: &'static str,
    pub tags: String,
    pub published: String,
}

impl AdminRow {
    pub fn from_item(item: &ContentItem, now: DateTime<Utc>) -> Self {
        let status = item.status(now);
        AdminRow {
            id: item.id,
            title: item.title.clone(),
            path: item.path(),
            status: status.label(),
            status_class: match status {
                PublicationStatus::Draft => "draft",
                PublicationStatus::Scheduled => "scheduled",
                PublicationStatus::Live => "live",
            },
            tags: item.tag_list().join(", "),
            published: item
                .published_at
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "—".to_string()),
        }
    }
}

/// Dashboard row.
pub struct CountRow {
    pub label: &'static str,
    pub section: &'static str,
    pub counts: ContentCounts,
}

/// Values shown in the editor form, as submitted or as stored.
#[derive(Default)]
pub struct EditorForm {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub video_url: String,
    pub tags: String,
    pub published_at: String,
}

impl EditorForm {
    /// Prefills the form from a stored item. The publish date is shown in
    /// the admin offset, matching how naive input is interpreted on save.
    pub fn from_item(item: &ContentItem, offset: FixedOffset) -> Self {
        EditorForm {
            title: item.title.clone(),
            slug: item.slug.clone(),
            description: item.description.clone().unwrap_or_default(),
            content: item.content.clone().unwrap_or_default(),
            image_url: item.image_url.clone().unwrap_or_default(),
            video_url: item.video_url.clone().unwrap_or_default(),
            tags: item.tags.clone().unwrap_or_default(),
            published_at: item
                .published_at
                .map(|t| t.with_timezone(&offset).format(DATETIME_LOCAL_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    pub fn from_request(req: &ContentRequest) -> Self {
        EditorForm {
            title: req.title.clone(),
            slug: req.slug.clone().unwrap_or_default(),
            description: req.description.clone().unwrap_or_default(),
            content: req.content.clone().unwrap_or_default(),
            image_url: req.image_url.clone().unwrap_or_default(),
            video_url: req.video_url.clone().unwrap_or_default(),
            tags: req.tags.clone().unwrap_or_default(),
            published_at: req.published_at.clone().unwrap_or_default(),
        }
    }
}

/// One-line message for an error shown above a form.
///
/// Field-level validation failures are listed as `field: message`.
pub fn form_error_message(err: &AppError) -> String {
    let info = err.to_error_info();

    let fields: Vec<String> = match &info.details {
        Value::Object(map) if !map.is_empty() && map.values().all(Value::is_array) => {
            let mut fields: Vec<String> = map
                .iter()
                .map(|(field, messages)| {
                    let messages: Vec<&str> = messages
                        .as_array()
                        .into_iter()
                        .flatten()
                        .filter_map(Value::as_str)
                        .collect();
                    format!("{}: {}", field, messages.join(", "))
                })
                .collect();
            fields.sort();
            fields
        }
        _ => Vec::new(),
    };

    if fields.is_empty() {
        info.message
    } else {
        format!("{} ({})", info.message, fields.join("; "))
    }
}
