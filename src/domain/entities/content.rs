//! Content entity shared by the four published content types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::visibility::{self, PublicationStatus};
use crate::error::AppError;
use crate::utils::tags::parse_tags;

/// The four content types. They are structurally identical and differ only
/// in where they are stored and which URL section serves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Article,
    Research,
    Project,
    Website,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Article,
        ContentKind::Research,
        ContentKind::Project,
        ContentKind::Website,
    ];

    /// URL path segment, e.g. `/projects/{slug}`.
    pub fn section(self) -> &'static str {
        match self {
            ContentKind::Article => "articles",
            ContentKind::Research => "research",
            ContentKind::Project => "projects",
            ContentKind::Website => "websites",
        }
    }

    /// Backing table name. Only ever one of four static identifiers.
    pub fn table(self) -> &'static str {
        self.section()
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Article => "Article",
            ContentKind::Research => "Research",
            ContentKind::Project => "Project",
            ContentKind::Website => "Website",
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            ContentKind::Article => "Articles",
            ContentKind::Research => "Research",
            ContentKind::Project => "Projects",
            ContentKind::Website => "Websites",
        }
    }

    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.section() == section)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

impl FromStr for ContentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_section(s)
            .ok_or_else(|| AppError::not_found("Unknown content section", json!({ "section": s })))
    }
}

/// Media attached to an item. An image wins when both URLs are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Image(String),
    Video(String),
}

/// A stored content item of any [`ContentKind`].
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub id: i64,
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Trimmed, non-empty tags in stored order.
    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(self.tags.as_deref())
    }

    pub fn status(&self, now: DateTime<Utc>) -> PublicationStatus {
        PublicationStatus::of(self.published_at, now)
    }

    /// Strict visibility, as used by the detail page.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        visibility::is_visible(self.published_at, now)
    }

    pub fn media(&self) -> Option<Media> {
        match (&self.image_url, &self.video_url) {
            (Some(image), _) => Some(Media::Image(image.clone())),
            (None, Some(video)) => Some(Media::Video(video.clone())),
            (None, None) => None,
        }
    }

    /// Public URL path of the item.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.kind.section(), self.slug)
    }
}

/// Editable fields of an item, used for both creation and full updates.
///
/// `published_at` has already been resolved by the visibility policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentFields {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}
