//! Handlers for content management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::content::{ContentListResponse, ContentRequest, ContentResponse};
use crate::domain::entities::{ContentItem, ContentKind};
use crate::error::AppError;
use crate::state::AppState;

fn respond(state: &AppState, item: ContentItem) -> Json<ContentResponse> {
    Json(ContentResponse::from_item(item, state.content_service.now()))
}

/// Lists every item of a section, including drafts and scheduled items.
///
/// # Endpoint
///
/// `GET /api/content/{section}`
///
/// `section` is one of `articles`, `research`, `projects`, `websites`.
/// Items are ordered by creation time, newest first.
pub async fn list_content_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<ContentListResponse>, AppError> {
    let kind: ContentKind = section.parse()?;
    let now = state.content_service.now();

    let items: Vec<ContentResponse> = state
        .content_service
        .list_all(kind)
        .await?
        .into_iter()
        .map(|item| ContentResponse::from_item(item, now))
        .collect();

    Ok(Json(ContentListResponse {
        total: items.len(),
        items,
    }))
}

/// Creates a content item.
///
/// # Endpoint
///
/// `POST /api/content/{section}`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Orbital mechanics notes",
///   "slug": "orbital-notes",          // optional, generated from title
///   "tags": "physics, notes",         // optional
///   "publishedAt": "2026-11-01T09:00" // optional, blank = draft
/// }
/// ```
///
/// # Errors
///
/// - **400**: validation failure or unparseable `published_at`
/// - **404**: unknown section
/// - **409**: slug already used in this section
pub async fn create_content_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(payload): Json<ContentRequest>,
) -> Result<(StatusCode, Json<ContentResponse>), AppError> {
    let kind: ContentKind = section.parse()?;
    let payload = payload.normalized();
    payload.validate()?;

    let item = state
        .content_service
        .create(kind, payload.into_input())
        .await?;

    Ok((StatusCode::CREATED, respond(&state, item)))
}

/// Returns one item by id regardless of its publication status.
///
/// `GET /api/content/{section}/{id}`
pub async fn get_content_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
) -> Result<Json<ContentResponse>, AppError> {
    let kind: ContentKind = section.parse()?;
    let item = state.content_service.get(kind, id).await?;

    Ok(respond(&state, item))
}

/// Replaces all editable fields of an item.
///
/// # Endpoint
///
/// `PUT /api/content/{section}/{id}`
///
/// Takes the same body as create. Omitted optional fields are cleared, and
/// the publish date is resolved again against the current time.
pub async fn update_content_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
    Json(payload): Json<ContentRequest>,
) -> Result<Json<ContentResponse>, AppError> {
    let kind: ContentKind = section.parse()?;
    let payload = payload.normalized();
    payload.validate()?;

    let item = state
        .content_service
        .update(kind, id, payload.into_input())
        .await?;

    Ok(respond(&state, item))
}

/// Turns an item back into a draft.
///
/// `POST /api/content/{section}/{id}/unpublish`
pub async fn unpublish_content_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
) -> Result<Json<ContentResponse>, AppError> {
    let kind: ContentKind = section.parse()?;
    let item = state.content_service.unpublish(kind, id).await?;

    Ok(respond(&state, item))
}

/// Publishes an item immediately.
///
/// `POST /api/content/{section}/{id}/publish`
pub async fn publish_content_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
) -> Result<Json<ContentResponse>, AppError> {
    let kind: ContentKind = section.parse()?;
    let item = state.content_service.publish_now(kind, id).await?;

    Ok(respond(&state, item))
}
