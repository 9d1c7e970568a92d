//! PostgreSQL implementation of content repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{ContentFields, ContentItem, ContentKind};
use crate::domain::repositories::{ContentCounts, ContentRepository};
use crate::error::AppError;

const COLUMNS: &str = "id, title, slug, description, content, image_url, video_url, tags, \
                       published_at, created_at, updated_at";

/// PostgreSQL repository for content items.
///
/// Each [`ContentKind`] has its own table with identical columns. Table
/// names come from [`ContentKind::table`] and are never user input.
pub struct PgContentRepository {
    pool: Arc<PgPool>,
}

impl PgContentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ContentRow {
    id: i64,
    title: String,
    slug: String,
    description: Option<String>,
    content: Option<String>,
    image_url: Option<String>,
    video_url: Option<String>,
    tags: Option<String>,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContentRow {
    fn into_item(self, kind: ContentKind) -> ContentItem {
        ContentItem {
            id: self.id,
            kind,
            title: self.title,
            slug: self.slug,
            description: self.description,
            content: self.content,
            image_url: self.image_url,
            video_url: self.video_url,
            tags: self.tags,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn into_items(rows: Vec<ContentRow>, kind: ContentKind) -> Vec<ContentItem> {
    rows.into_iter().map(|row| row.into_item(kind)).collect()
}

fn not_found(kind: ContentKind, id: i64) -> AppError {
    AppError::not_found(
        format!("{} not found", kind.label()),
        json!({ "section": kind.section(), "id": id }),
    )
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn create(&self, kind: ContentKind, fields: ContentFields) -> Result<ContentItem, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {table}
                (title, slug, description, content, image_url, video_url, tags, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#,
            table = kind.table()
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(fields.title)
            .bind(fields.slug)
            .bind(fields.description)
            .bind(fields.content)
            .bind(fields.image_url)
            .bind(fields.video_url)
            .bind(fields.tags)
            .bind(fields.published_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into_item(kind))
    }

    async fn find_by_id(&self, kind: ContentKind, id: i64) -> Result<Option<ContentItem>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {table} WHERE id = $1",
            table = kind.table()
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(|r| r.into_item(kind)))
    }

    async fn find_by_slug(&self, kind: ContentKind, slug: &str) -> Result<Option<ContentItem>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = $1",
            table = kind.table()
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(|r| r.into_item(kind)))
    }

    async fn list_published(
        &self,
        kind: ContentKind,
        cutoff: DateTime<Utc>,
        tag: Option<String>,
    ) -> Result<Vec<ContentItem>, AppError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM {table}
            WHERE published_at IS NOT NULL
              AND published_at <= $1
              AND ($2::text IS NULL OR POSITION(LOWER($2::text) IN LOWER(tags)) > 0)
            ORDER BY published_at DESC, id DESC
            "#,
            table = kind.table()
        );

        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(cutoff)
            .bind(tag)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(into_items(rows, kind))
    }

    async fn list_related(
        &self,
        kind: ContentKind,
        exclude_id: i64,
        tag: String,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ContentItem>, AppError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM {table}
            WHERE published_at IS NOT NULL
              AND published_at <= $1
              AND id <> $2
              AND POSITION($3 IN tags) > 0
            ORDER BY published_at DESC, id DESC
            LIMIT $4
            "#,
            table = kind.table()
        );

        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(now)
            .bind(exclude_id)
            .bind(tag)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(into_items(rows, kind))
    }

    async fn list_all(&self, kind: ContentKind) -> Result<Vec<ContentItem>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {table} ORDER BY created_at DESC, id DESC",
            table = kind.table()
        );

        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(into_items(rows, kind))
    }

    async fn update(&self, kind: ContentKind, id: i64, fields: ContentFields) -> Result<ContentItem, AppError> {
        let sql = format!(
            r#"
            UPDATE {table}
            SET title = $2,
                slug = $3,
                description = $4,
                content = $5,
                image_url = $6,
                video_url = $7,
                tags = $8,
                published_at = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#,
            table = kind.table()
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .bind(fields.title)
            .bind(fields.slug)
            .bind(fields.description)
            .bind(fields.content)
            .bind(fields.image_url)
            .bind(fields.video_url)
            .bind(fields.tags)
            .bind(fields.published_at)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|r| r.into_item(kind))
            .ok_or_else(|| not_found(kind, id))
    }

    async fn set_published_at(
        &self,
        kind: ContentKind,
        id: i64,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<ContentItem, AppError> {
        let sql = format!(
            r#"
            UPDATE {table}
            SET published_at = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#,
            table = kind.table()
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .bind(published_at)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|r| r.into_item(kind))
            .ok_or_else(|| not_found(kind, id))
    }

    async fn counts(&self, kind: ContentKind, now: DateTime<Utc>) -> Result<ContentCounts, AppError> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE published_at IS NULL) AS drafts,
                COUNT(*) FILTER (WHERE published_at > $1) AS scheduled,
                COUNT(*) FILTER (WHERE published_at <= $1) AS live
            FROM {table}
            "#,
            table = kind.table()
        );

        let (total, drafts, scheduled, live): (i64, i64, i64, i64) = sqlx::query_as(&sql)
            .bind(now)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(ContentCounts {
            total,
            drafts,
            scheduled,
            live,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
