//! Repository trait for content items of every kind.

use crate::domain::entities::{ContentFields, ContentItem, ContentKind};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-kind item counts split by publication status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentCounts {
    pub total: i64,
    pub drafts: i64,
    pub scheduled: i64,
    pub live: i64,
}

/// Repository interface for content storage.
///
/// Every method takes the [`ContentKind`] to operate on; each kind lives in
/// its own table. Visibility rules are decided by the caller, which passes
/// the instants to compare against.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgContentRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryContentRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Inserts a new item.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken for this kind.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, kind: ContentKind, fields: ContentFields) -> Result<ContentItem, AppError>;

    async fn find_by_id(&self, kind: ContentKind, id: i64) -> Result<Option<ContentItem>, AppError>;

    async fn find_by_slug(&self, kind: ContentKind, slug: &str) -> Result<Option<ContentItem>, AppError>;

    /// Items with `published_at <= cutoff`, newest `published_at` first.
    ///
    /// When `tag` is set, only items whose raw tag string contains it
    /// (case-insensitive) are returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_published(
        &self,
        kind: ContentKind,
        cutoff: DateTime<Utc>,
        tag: Option<String>,
    ) -> Result<Vec<ContentItem>, AppError>;

    /// Up to `limit` items with `published_at <= now` whose raw tag string
    /// contains `tag` (case-sensitive), excluding `exclude_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_related(
        &self,
        kind: ContentKind,
        exclude_id: i64,
        tag: String,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ContentItem>, AppError>;

    /// Every item regardless of status, newest `created_at` first.
    async fn list_all(&self, kind: ContentKind) -> Result<Vec<ContentItem>, AppError>;

    /// Replaces all editable fields of an item.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the item does not exist.
    /// Returns [`AppError::Conflict`] if the new slug is taken by another item.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, kind: ContentKind, id: i64, fields: ContentFields) -> Result<ContentItem, AppError>;

    /// Sets or clears the publish timestamp only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the item does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_published_at(
        &self,
        kind: ContentKind,
        id: i64,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<ContentItem, AppError>;

    /// Counts items by status relative to `now`.
    async fn counts(&self, kind: ContentKind, now: DateTime<Utc>) -> Result<ContentCounts, AppError>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
