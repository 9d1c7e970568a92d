//! DTOs for content create/update and content responses.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::application::services::ContentInput;
use crate::domain::entities::{ContentItem, ContentKind};

/// Lowercase words of `[a-z0-9_]` joined by single hyphens.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+(?:-[a-z0-9_]+)*$").unwrap());

/// Create or full-update request, accepted as JSON or as an HTML form.
///
/// JSON clients may use camelCase for the multi-word fields. Blank strings
/// are treated as absent; call [`ContentRequest::normalized`] before
/// validating.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContentRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "Title is required"))]
    pub title: String,

    /// Generated from the title when absent.
    #[validate(length(max = 200))]
    #[validate(regex(
        path = "*SLUG_REGEX",
        message = "Slug may only contain lowercase letters, digits, underscores and single hyphens"
    ))]
    pub slug: Option<String>,

    pub description: Option<String>,

    pub content: Option<String>,

    #[serde(alias = "imageUrl")]
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,

    #[serde(alias = "videoUrl")]
    #[validate(length(max = 2048))]
    pub video_url: Option<String>,

    #[validate(length(max = 500))]
    pub tags: Option<String>,

    /// Raw date/time string; resolved by the visibility policy.
    #[serde(alias = "publishedAt")]
    pub published_at: Option<String>,
}

impl ContentRequest {
    /// Trims single-line fields and turns blank values into `None`.
    ///
    /// `description` and `content` keep their inner whitespace.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            slug: trimmed(self.slug),
            description: non_blank(self.description),
            content: non_blank(self.content),
            image_url: trimmed(self.image_url),
            video_url: trimmed(self.video_url),
            tags: trimmed(self.tags),
            published_at: trimmed(self.published_at),
        }
    }

    pub fn into_input(self) -> ContentInput {
        ContentInput {
            title: self.title,
            slug: self.slug,
            description: self.description,
            content: self.content,
            image_url: self.image_url,
            video_url: self.video_url,
            tags: self.tags,
            published_at: self.published_at,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A content item as returned by the admin API.
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub id: i64,
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Option<String>,
    pub tag_list: Vec<String>,
    /// `draft`, `scheduled` or `published`.
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub path: String,
}

impl ContentResponse {
    pub fn from_item(item: ContentItem, now: DateTime<Utc>) -> Self {
        Self {
            tag_list: item.tag_list(),
            status: item.status(now).label().to_lowercase(),
            path: item.path(),
            id: item.id,
            kind: item.kind,
            title: item.title,
            slug: item.slug,
            description: item.description,
            content: item.content,
            image_url: item.image_url,
            video_url: item.video_url,
            tags: item.tags,
            published_at: item.published_at,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// List of items of one kind.
#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub total: usize,
    pub items: Vec<ContentResponse>,
}
