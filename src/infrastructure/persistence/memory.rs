//! In-memory content repository.
//!
//! Mirrors the PostgreSQL semantics (ordering, slug uniqueness, substring
//! tag matching) without a database. Used by the HTTP integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::clock::Clock;
use crate::domain::entities::{ContentFields, ContentItem, ContentKind};
use crate::domain::repositories::{ContentCounts, ContentRepository};
use crate::domain::visibility::PublicationStatus;
use crate::error::AppError;
use crate::utils::tags::{contains_tag, matches_tag_filter};

#[derive(Default)]
struct Store {
    next_id: i64,
    items: HashMap<ContentKind, Vec<ContentItem>>,
}

impl Store {
    fn table(&self, kind: ContentKind) -> &[ContentItem] {
        self.items.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    fn slug_taken(&self, kind: ContentKind, slug: &str, except: Option<i64>) -> bool {
        self.table(kind)
            .iter()
            .any(|item| item.slug == slug && Some(item.id) != except)
    }
}

/// Process-local [`ContentRepository`] backed by a `RwLock<HashMap>`.
///
/// `created_at`/`updated_at` are taken from the injected clock so tests can
/// control ordering.
pub struct InMemoryContentRepository {
    store: RwLock<Store>,
    clock: Arc<dyn Clock>,
}

impl InMemoryContentRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            clock,
        }
    }
}

fn slug_conflict(kind: ContentKind, slug: &str) -> AppError {
    AppError::conflict(
        "Slug already exists",
        json!({ "section": kind.section(), "slug": slug }),
    )
}

fn not_found(kind: ContentKind, id: i64) -> AppError {
    AppError::not_found(
        format!("{} not found", kind.label()),
        json!({ "section": kind.section(), "id": id }),
    )
}

/// Newest `published_at` first, ties broken by id.
fn by_published_desc(a: &ContentItem, b: &ContentItem) -> std::cmp::Ordering {
    b.published_at
        .cmp(&a.published_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn create(&self, kind: ContentKind, fields: ContentFields) -> Result<ContentItem, AppError> {
        let mut store = self.store.write().await;
        if store.slug_taken(kind, &fields.slug, None) {
            return Err(slug_conflict(kind, &fields.slug));
        }

        store.next_id += 1;
        let now = self.clock.now();
        let item = ContentItem {
            id: store.next_id,
            kind,
            title: fields.title,
            slug: fields.slug,
            description: fields.description,
            content: fields.content,
            image_url: fields.image_url,
            video_url: fields.video_url,
            tags: fields.tags,
            published_at: fields.published_at,
            created_at: now,
            updated_at: now,
        };

        store.items.entry(kind).or_default().push(item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, kind: ContentKind, id: i64) -> Result<Option<ContentItem>, AppError> {
        let store = self.store.read().await;
        Ok(store.table(kind).iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_slug(&self, kind: ContentKind, slug: &str) -> Result<Option<ContentItem>, AppError> {
        let store = self.store.read().await;
        Ok(store.table(kind).iter().find(|i| i.slug == slug).cloned())
    }

    async fn list_published(
        &self,
        kind: ContentKind,
        cutoff: DateTime<Utc>,
        tag: Option<String>,
    ) -> Result<Vec<ContentItem>, AppError> {
        let store = self.store.read().await;
        let mut items: Vec<ContentItem> = store
            .table(kind)
            .iter()
            .filter(|i| i.published_at.is_some_and(|t| t <= cutoff))
            .filter(|i| {
                tag.as_deref()
                    .is_none_or(|t| matches_tag_filter(i.tags.as_deref(), t))
            })
            .cloned()
            .collect();

        items.sort_by(by_published_desc);
        Ok(items)
    }

    async fn list_related(
        &self,
        kind: ContentKind,
        exclude_id: i64,
        tag: String,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ContentItem>, AppError> {
        let store = self.store.read().await;
        let mut items: Vec<ContentItem> = store
            .table(kind)
            .iter()
            .filter(|i| i.id != exclude_id && i.is_visible(now))
            .filter(|i| contains_tag(i.tags.as_deref(), &tag))
            .cloned()
            .collect();

        items.sort_by(by_published_desc);
        items.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(items)
    }

    async fn list_all(&self, kind: ContentKind) -> Result<Vec<ContentItem>, AppError> {
        let store = self.store.read().await;
        let mut items = store.table(kind).to_vec();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    async fn update(&self, kind: ContentKind, id: i64, fields: ContentFields) -> Result<ContentItem, AppError> {
        let mut store = self.store.write().await;
        if store.slug_taken(kind, &fields.slug, Some(id)) {
            return Err(slug_conflict(kind, &fields.slug));
        }

        let now = self.clock.now();
        let item = store
            .items
            .get_mut(&kind)
            .and_then(|items| items.iter_mut().find(|i| i.id == id))
            .ok_or_else(|| not_found(kind, id))?;

        item.title = fields.title;
        item.slug = fields.slug;
        item.description = fields.description;
        item.content = fields.content;
        item.image_url = fields.image_url;
        item.video_url = fields.video_url;
        item.tags = fields.tags;
        item.published_at = fields.published_at;
        item.updated_at = now;

        Ok(item.clone())
    }

    async fn set_published_at(
        &self,
        kind: ContentKind,
        id: i64,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<ContentItem, AppError> {
        let mut store = self.store.write().await;
        let now = self.clock.now();
        let item = store
            .items
            .get_mut(&kind)
            .and_then(|items| items.iter_mut().find(|i| i.id == id))
            .ok_or_else(|| not_found(kind, id))?;

        item.published_at = published_at;
        item.updated_at = now;

        Ok(item.clone())
    }

    async fn counts(&self, kind: ContentKind, now: DateTime<Utc>) -> Result<ContentCounts, AppError> {
        let store = self.store.read().await;
        let counts = store
            .table(kind)
            .iter()
            .fold(ContentCounts::default(), |mut acc, item| {
                acc.total += 1;
                match PublicationStatus::of(item.published_at, now) {
                    PublicationStatus::Draft => acc.drafts += 1,
                    PublicationStatus::Scheduled => acc.scheduled += 1,
                    PublicationStatus::Live => acc.live += 1,
                }
                acc
            });

        Ok(counts)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn fields(slug: &str, tags: Option<&str>, published_at: Option<DateTime<Utc>>) -> ContentFields {
        ContentFields {
            title: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            content: None,
            image_url: None,
            video_url: None,
            tags: tags.map(str::to_string),
            published_at,
        }
    }

    fn repo() -> InMemoryContentRepository {
        InMemoryContentRepository::new(Arc::new(FixedClock::new(now())))
    }

    #[tokio::test]
    async fn test_slug_unique_per_kind() {
        let repo = repo();
        repo.create(ContentKind::Article, fields("same", None, None))
            .await
            .unwrap();

        let dup = repo.create(ContentKind::Article, fields("same", None, None)).await;
        assert!(matches!(dup.unwrap_err(), AppError::Conflict { .. }));

        assert!(
            repo.create(ContentKind::Project, fields("same", None, None))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_list_published_orders_and_filters() {
        let repo = repo();
        let kind = ContentKind::Article;
        repo.create(kind, fields("old", Some("Art"), Some(now() - Duration::days(2))))
            .await
            .unwrap();
        repo.create(kind, fields("new", Some("smart"), Some(now() - Duration::days(1))))
            .await
            .unwrap();
        repo.create(kind, fields("draft", Some("art"), None))
            .await
            .unwrap();
        repo.create(kind, fields("later", Some("art"), Some(now() + Duration::days(1))))
            .await
            .unwrap();

        let all = repo.list_published(kind, now(), None).await.unwrap();
        let slugs: Vec<_> = all.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "old"]);

        let tagged = repo
            .list_published(kind, now(), Some("ART".to_string()))
            .await
            .unwrap();
        assert_eq!(tagged.len(), 2);
    }

    #[tokio::test]
    async fn test_list_related_excludes_self_and_hidden() {
        let repo = repo();
        let kind = ContentKind::Research;
        let me = repo
            .create(kind, fields("me", Some("ml"), Some(now())))
            .await
            .unwrap();
        for n in 0..4 {
            repo.create(
                kind,
                fields(&format!("r{n}"), Some("ml, data"), Some(now() - Duration::hours(n))),
            )
            .await
            .unwrap();
        }
        repo.create(kind, fields("upper", Some("ML"), Some(now())))
            .await
            .unwrap();
        repo.create(kind, fields("soon", Some("ml"), Some(now() + Duration::minutes(1))))
            .await
            .unwrap();

        let related = repo
            .list_related(kind, me.id, "ml".to_string(), now(), 3)
            .await
            .unwrap();
        let slugs: Vec<_> = related.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, ["r0", "r1", "r2"]);
    }

    #[tokio::test]
    async fn test_update_and_set_published_at() {
        let repo = repo();
        let kind = ContentKind::Website;
        let item = repo.create(kind, fields("site", None, None)).await.unwrap();
        repo.create(kind, fields("other", None, None)).await.unwrap();

        let clash = repo.update(kind, item.id, fields("other", None, None)).await;
        assert!(matches!(clash.unwrap_err(), AppError::Conflict { .. }));

        let updated = repo
            .update(kind, item.id, fields("site-2", Some("x"), None))
            .await
            .unwrap();
        assert_eq!(updated.slug, "site-2");

        let live = repo.set_published_at(kind, item.id, Some(now())).await.unwrap();
        assert_eq!(live.published_at, Some(now()));

        let missing = repo.set_published_at(kind, 999, None).await;
        assert!(matches!(missing.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_counts_split_by_status() {
        let repo = repo();
        let kind = ContentKind::Article;
        repo.create(kind, fields("a", None, None)).await.unwrap();
        repo.create(kind, fields("b", None, Some(now() + Duration::hours(1))))
            .await
            .unwrap();
        repo.create(kind, fields("c", None, Some(now()))).await.unwrap();

        let counts = repo.counts(kind, now()).await.unwrap();
        assert_eq!(
            counts,
            ContentCounts {
                total: 3,
                drafts: 1,
                scheduled: 1,
                live: 1
            }
        );
    }
}
