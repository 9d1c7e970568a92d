//! Content listing, lookup and editing service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::clock::Clock;
use crate::domain::entities::{ContentFields, ContentItem, ContentKind};
use crate::domain::repositories::{ContentCounts, ContentRepository};
use crate::domain::visibility::{self, VisibilityPolicy};
use crate::error::AppError;
use crate::utils::slug::slugify;

/// Maximum number of related items shown under a detail page.
pub const RELATED_LIMIT: i64 = 3;

/// Number of items per kind shown on the home page.
pub const HOME_LATEST_LIMIT: usize = 3;

/// Editable fields as submitted by an admin, before normalization.
///
/// Blank optional fields have already been turned into `None` by the
/// request layer. `published_at` is still the raw submitted string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentInput {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Option<String>,
    pub published_at: Option<String>,
}

/// Service for public reads and admin writes of content items.
///
/// Every visibility decision goes through the configured
/// [`VisibilityPolicy`] and the injected [`Clock`].
pub struct ContentService<R: ContentRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: VisibilityPolicy,
}

impl<R: ContentRepository + ?Sized> ContentService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, policy: VisibilityPolicy) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn policy(&self) -> &VisibilityPolicy {
        &self.policy
    }

    /// Public listing: items inside the listing tolerance window, newest first.
    ///
    /// A blank `tag` is ignored. A non-blank one is matched as a
    /// case-insensitive substring of the stored tag string.
    pub async fn list_published(
        &self,
        kind: ContentKind,
        tag: Option<&str>,
    ) -> Result<Vec<ContentItem>, AppError> {
        let cutoff = self.policy.listing_cutoff(self.now());
        let tag = tag.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);

        self.repository.list_published(kind, cutoff, tag).await
    }

    /// Newest listed items of a kind, for the home page.
    pub async fn latest(&self, kind: ContentKind, limit: usize) -> Result<Vec<ContentItem>, AppError> {
        let mut items = self.list_published(kind, None).await?;
        items.truncate(limit);
        Ok(items)
    }

    /// Detail lookup with strict visibility.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown slugs, drafts and items
    /// scheduled in the future, including those already shown in listings.
    pub async fn get_published(&self, kind: ContentKind, slug: &str) -> Result<ContentItem, AppError> {
        let now = self.now();

        self.repository
            .find_by_slug(kind, slug)
            .await?
            .filter(|item| item.is_visible(now))
            .ok_or_else(|| {
                AppError::not_found(
                    format!("{} not found", kind.label()),
                    json!({ "section": kind.section(), "slug": slug }),
                )
            })
    }

    /// Up to [`RELATED_LIMIT`] visible items of the same kind sharing the
    /// item's first tag.
    pub async fn related(&self, item: &ContentItem) -> Result<Vec<ContentItem>, AppError> {
        let Some(first_tag) = item.tag_list().into_iter().next() else {
            return Ok(Vec::new());
        };

        self.repository
            .list_related(item.kind, item.id, first_tag, self.now(), RELATED_LIMIT)
            .await
    }

    /// Every item of a kind regardless of status, newest created first.
    pub async fn list_all(&self, kind: ContentKind) -> Result<Vec<ContentItem>, AppError> {
        self.repository.list_all(kind).await
    }

    /// Admin lookup by id, ignoring visibility.
    pub async fn get(&self, kind: ContentKind, id: i64) -> Result<ContentItem, AppError> {
        self.repository
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| not_found(kind, id))
    }

    /// Creates an item as draft, scheduled or published depending on the
    /// submitted publish date.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank title, an empty slug,
    /// both media URLs set, or an unparseable publish date.
    /// Returns [`AppError::Conflict`] if the slug is taken.
    pub async fn create(&self, kind: ContentKind, input: ContentInput) -> Result<ContentItem, AppError> {
        let fields = self.prepare(input)?;

        if self.repository.find_by_slug(kind, &fields.slug).await?.is_some() {
            return Err(slug_conflict(kind, &fields.slug));
        }

        let item = self.repository.create(kind, fields).await?;
        tracing::info!(
            kind = %kind,
            id = item.id,
            slug = %item.slug,
            status = item.status(self.now()).label(),
            "Content created"
        );

        Ok(item)
    }

    /// Replaces all editable fields of an item.
    ///
    /// The publish date is resolved again, so saving an already live item
    /// with its past date unchanged moves its timestamp to now. An absent or
    /// blank slug keeps the stored one instead of slugifying the new title.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus [`AppError::NotFound`] for unknown ids.
    pub async fn update(
        &self,
        kind: ContentKind,
        id: i64,
        input: ContentInput,
    ) -> Result<ContentItem, AppError> {
        let existing = self.get(kind, id).await?;
        let input = match input.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => input,
            _ => ContentInput {
                slug: Some(existing.slug),
                ..input
            },
        };
        let fields = self.prepare(input)?;

        if let Some(other) = self.repository.find_by_slug(kind, &fields.slug).await?
            && other.id != id
        {
            return Err(slug_conflict(kind, &fields.slug));
        }

        let item = self.repository.update(kind, id, fields).await?;
        tracing::info!(
            kind = %kind,
            id = item.id,
            slug = %item.slug,
            status = item.status(self.now()).label(),
            "Content updated"
        );

        Ok(item)
    }

    /// Turns an item back into a draft.
    pub async fn unpublish(&self, kind: ContentKind, id: i64) -> Result<ContentItem, AppError> {
        let item = self
            .repository
            .set_published_at(kind, id, visibility::unpublish())
            .await?;
        tracing::info!(kind = %kind, id, slug = %item.slug, "Content unpublished");

        Ok(item)
    }

    /// Publishes an item immediately, whatever its current status.
    pub async fn publish_now(&self, kind: ContentKind, id: i64) -> Result<ContentItem, AppError> {
        let item = self
            .repository
            .set_published_at(kind, id, visibility::publish_now(self.now()))
            .await?;
        tracing::info!(kind = %kind, id, slug = %item.slug, "Content published");

        Ok(item)
    }

    /// Status counts for every kind, in [`ContentKind::ALL`] order.
    pub async fn counts(&self) -> Result<Vec<(ContentKind, ContentCounts)>, AppError> {
        let now = self.now();
        let mut counts = Vec::with_capacity(ContentKind::ALL.len());
        for kind in ContentKind::ALL {
            counts.push((kind, self.repository.counts(kind, now).await?));
        }
        Ok(counts)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Validates an input and resolves it into storable fields.
    fn prepare(&self, input: ContentInput) -> Result<ContentFields, AppError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::bad_request(
                "Title is required",
                json!({ "field": "title" }),
            ));
        }

        let slug = match input.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slugify(&title),
        };
        if slug.is_empty() {
            return Err(AppError::bad_request(
                "Slug is required",
                json!({ "field": "slug", "title": title }),
            ));
        }

        if input.image_url.is_some() && input.video_url.is_some() {
            return Err(AppError::bad_request(
                "Choose either an image or a video, not both",
                json!({ "fields": ["image_url", "video_url"] }),
            ));
        }

        let published_at = self
            .policy
            .resolve_publish_timestamp(input.published_at.as_deref(), self.now())?;

        Ok(ContentFields {
            title,
            slug,
            description: input.description,
            content: input.content,
            image_url: input.image_url,
            video_url: input.video_url,
            tags: input.tags,
            published_at,
        })
    }
}

fn not_found(kind: ContentKind, id: i64) -> AppError {
    AppError::not_found(
        format!("{} not found", kind.label()),
        json!({ "section": kind.section(), "id": id }),
    )
}

fn slug_conflict(kind: ContentKind, slug: &str) -> AppError {
    AppError::conflict(
        "Slug already exists",
        json!({ "section": kind.section(), "slug": slug }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::repositories::MockContentRepository;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn service(repo: MockContentRepository) -> ContentService<MockContentRepository> {
        ContentService::new(
            Arc::new(repo),
            Arc::new(FixedClock::new(now())),
            VisibilityPolicy::default(),
        )
    }

    fn item(id: i64, slug: &str, tags: Option<&str>, published_at: Option<DateTime<Utc>>) -> ContentItem {
        ContentItem {
            id,
            kind: ContentKind::Article,
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: None,
            content: None,
            image_url: None,
            video_url: None,
            tags: tags.map(str::to_string),
            published_at,
            created_at: now() - Duration::days(1),
            updated_at: now() - Duration::days(1),
        }
    }

    fn stored(kind: ContentKind, fields: ContentFields) -> ContentItem {
        ContentItem {
            id: 7,
            kind,
            title: fields.title,
            slug: fields.slug,
            description: fields.description,
            content: fields.content,
            image_url: fields.image_url,
            video_url: fields.video_url,
            tags: fields.tags,
            published_at: fields.published_at,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn input(title: &str) -> ContentInput {
        ContentInput {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_published_uses_tolerance_cutoff() {
        let mut repo = MockContentRepository::new();
        repo.expect_list_published()
            .withf(|kind, cutoff, tag| {
                *kind == ContentKind::Article
                    && *cutoff == now() + Duration::minutes(5)
                    && tag.as_deref() == Some("rust")
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let result = service(repo)
            .list_published(ContentKind::Article, Some(" rust "))
            .await;

        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_published_ignores_blank_tag() {
        let mut repo = MockContentRepository::new();
        repo.expect_list_published()
            .withf(|_, _, tag| tag.is_none())
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        assert!(
            service(repo)
                .list_published(ContentKind::Article, Some("   "))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_get_published_hides_scheduled_item() {
        let mut repo = MockContentRepository::new();
        let soon = item(1, "soon", None, Some(now() + Duration::minutes(2)));
        repo.expect_find_by_slug()
            .times(1)
            .returning(move |_, _| Ok(Some(soon.clone())));

        let result = service(repo).get_published(ContentKind::Article, "soon").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_published_hides_draft() {
        let mut repo = MockContentRepository::new();
        let draft = item(1, "draft", None, None);
        repo.expect_find_by_slug()
            .times(1)
            .returning(move |_, _| Ok(Some(draft.clone())));

        let result = service(repo).get_published(ContentKind::Article, "draft").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_published_returns_live_item() {
        let mut repo = MockContentRepository::new();
        let live = item(1, "live", None, Some(now()));
        repo.expect_find_by_slug()
            .withf(|_, slug| slug == "live")
            .times(1)
            .returning(move |_, _| Ok(Some(live.clone())));

        let result = service(repo).get_published(ContentKind::Article, "live").await;

        assert_eq!(result.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_related_uses_first_tag() {
        let mut repo = MockContentRepository::new();
        repo.expect_list_related()
            .withf(|kind, exclude, tag, at, limit| {
                *kind == ContentKind::Article
                    && *exclude == 4
                    && tag == "rust"
                    && *at == now()
                    && *limit == RELATED_LIMIT
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(vec![]));

        let current = item(4, "current", Some(" rust , web"), Some(now()));
        assert!(service(repo).related(&current).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_related_without_tags_skips_query() {
        let mut repo = MockContentRepository::new();
        repo.expect_list_related().times(0);

        let current = item(4, "current", Some(" , "), Some(now()));
        assert!(service(repo).related(&current).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_generates_slug_and_publishes_now() {
        let mut repo = MockContentRepository::new();
        repo.expect_find_by_slug()
            .withf(|_, slug| slug == "hello-world")
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_create()
            .withf(|_, fields| fields.slug == "hello-world" && fields.published_at == Some(now()))
            .times(1)
            .returning(|kind, fields| Ok(stored(kind, fields)));

        let mut new = input("Hello, World!");
        new.published_at = Some("2026-10-01T00:00:00Z".to_string());

        let created = service(repo)
            .create(ContentKind::Article, new)
            .await
            .unwrap();

        assert_eq!(created.slug, "hello-world");
        assert_eq!(created.published_at, Some(now()));
    }

    #[tokio::test]
    async fn test_create_schedules_future_date() {
        let mut repo = MockContentRepository::new();
        repo.expect_find_by_slug().returning(|_, _| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|kind, fields| Ok(stored(kind, fields)));

        let mut new = input("Later");
        new.published_at = Some("2026-10-20T09:00".to_string());

        let created = service(repo)
            .create(ContentKind::Project, new)
            .await
            .unwrap();

        assert_eq!(
            created.published_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_create_blank_date_is_draft() {
        let mut repo = MockContentRepository::new();
        repo.expect_find_by_slug().returning(|_, _| Ok(None));
        repo.expect_create()
            .withf(|_, fields| fields.published_at.is_none())
            .times(1)
            .returning(|kind, fields| Ok(stored(kind, fields)));

        let mut new = input("Draft");
        new.published_at = Some("  ".to_string());

        assert!(service(repo).create(ContentKind::Article, new).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_slug_conflict() {
        let mut repo = MockContentRepository::new();
        let existing = item(1, "taken", None, None);
        repo.expect_find_by_slug()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        repo.expect_create().times(0);

        let mut new = input("Anything");
        new.slug = Some("taken".to_string());

        let result = service(repo).create(ContentKind::Article, new).await;

        match result.unwrap_err() {
            AppError::Conflict { message, .. } => assert_eq!(message, "Slug already exists"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_date() {
        let mut repo = MockContentRepository::new();
        repo.expect_create().times(0);

        let mut new = input("Bad date");
        new.published_at = Some("not-a-date".to_string());

        let result = service(repo).create(ContentKind::Article, new).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_image_and_video() {
        let repo = MockContentRepository::new();

        let mut new = input("Both");
        new.image_url = Some("https://example.com/a.png".to_string());
        new.video_url = Some("https://example.com/a.mp4".to_string());

        let result = service(repo).create(ContentKind::Website, new).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let repo = MockContentRepository::new();

        let result = service(repo).create(ContentKind::Article, input("   ")).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_own_slug() {
        let mut repo = MockContentRepository::new();
        let current = item(3, "mine", None, Some(now() - Duration::days(3)));
        let same = current.clone();
        repo.expect_find_by_id()
            .times(1)
            .returning(move |_, _| Ok(Some(current.clone())));
        repo.expect_find_by_slug()
            .times(1)
            .returning(move |_, _| Ok(Some(same.clone())));
        repo.expect_update()
            .withf(|_, id, fields| *id == 3 && fields.slug == "mine")
            .times(1)
            .returning(|kind, _, fields| Ok(stored(kind, fields)));

        let mut edit = input("Mine");
        edit.slug = Some("mine".to_string());

        assert!(service(repo).update(ContentKind::Article, 3, edit).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_without_slug_keeps_stored_slug() {
        let mut repo = MockContentRepository::new();
        let current = item(3, "original-url", None, None);
        let same = current.clone();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(current.clone())));
        repo.expect_find_by_slug()
            .withf(|_, slug| slug == "original-url")
            .returning(move |_, _| Ok(Some(same.clone())));
        repo.expect_update()
            .withf(|_, _, fields| fields.slug == "original-url" && fields.title == "Brand New Title")
            .times(2)
            .returning(|kind, _, fields| Ok(stored(kind, fields)));

        let service = service(repo);
        let absent = input("Brand New Title");
        assert!(service.update(ContentKind::Article, 3, absent).await.is_ok());

        let mut blank = input("Brand New Title");
        blank.slug = Some("  ".to_string());
        assert!(service.update(ContentKind::Article, 3, blank).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_live_item_moves_past_date_to_now() {
        let mut repo = MockContentRepository::new();
        let current = item(3, "mine", None, Some(now() - Duration::days(3)));
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(current.clone())));
        repo.expect_find_by_slug().returning(|_, _| Ok(None));
        repo.expect_update()
            .withf(|_, _, fields| fields.published_at == Some(now()))
            .times(1)
            .returning(|kind, _, fields| Ok(stored(kind, fields)));

        let mut edit = input("Mine");
        edit.published_at = Some("2026-10-14T12:00:00Z".to_string());

        assert!(service(repo).update(ContentKind::Article, 3, edit).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_slug_taken_by_other_item() {
        let mut repo = MockContentRepository::new();
        let current = item(3, "mine", None, None);
        let other = item(9, "theirs", None, None);
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(current.clone())));
        repo.expect_find_by_slug()
            .returning(move |_, _| Ok(Some(other.clone())));
        repo.expect_update().times(0);

        let mut edit = input("Mine");
        edit.slug = Some("theirs".to_string());

        let result = service(repo).update(ContentKind::Article, 3, edit).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let mut repo = MockContentRepository::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let result = service(repo)
            .update(ContentKind::Article, 42, input("Gone"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unpublish_clears_timestamp() {
        let mut repo = MockContentRepository::new();
        repo.expect_set_published_at()
            .withf(|_, id, at| *id == 5 && at.is_none())
            .times(1)
            .returning(|_, id, at| Ok(item(id, "x", None, at)));

        let result = service(repo).unpublish(ContentKind::Research, 5).await;

        assert_eq!(result.unwrap().published_at, None);
    }

    #[tokio::test]
    async fn test_publish_now_sets_clock_time() {
        let mut repo = MockContentRepository::new();
        repo.expect_set_published_at()
            .withf(|_, id, at| *id == 5 && *at == Some(now()))
            .times(1)
            .returning(|_, id, at| Ok(item(id, "x", None, at)));

        let result = service(repo).publish_now(ContentKind::Research, 5).await;

        assert_eq!(result.unwrap().published_at, Some(now()));
    }

    #[tokio::test]
    async fn test_counts_cover_every_kind() {
        let mut repo = MockContentRepository::new();
        repo.expect_counts().times(4).returning(|_, _| {
            Ok(ContentCounts {
                total: 3,
                drafts: 1,
                scheduled: 1,
                live: 1,
            })
        });

        let counts = service(repo).counts().await.unwrap();

        assert_eq!(counts.len(), 4);
        assert_eq!(counts[1].0, ContentKind::Research);
        assert_eq!(counts[1].1.total, 3);
    }
}
