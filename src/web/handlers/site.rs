//! Public site pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::application::services::content_service::HOME_LATEST_LIMIT;
use crate::domain::entities::ContentKind;
use crate::state::AppState;
use crate::utils::tags::collect_tags;
use crate::web::error::PageError;
use crate::web::view::{ItemCard, ItemView, SectionPreview, TagLink};

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    sections: Vec<SectionPreview>,
}

/// Renders the home page with the newest listed items of every kind.
///
/// `GET /`
pub async fn home_handler(State(state): State<AppState>) -> Result<HomeTemplate, PageError> {
    let mut sections = Vec::with_capacity(ContentKind::ALL.len());
    for kind in ContentKind::ALL {
        let items = state
            .content_service
            .latest(kind, HOME_LATEST_LIMIT)
            .await?;
        sections.push(SectionPreview {
            label: kind.plural_label(),
            section: kind.section(),
            items: items.iter().map(ItemCard::from_item).collect(),
        });
    }

    Ok(HomeTemplate { sections })
}

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub tag: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "listing.html")]
pub struct ListingTemplate {
    label: &'static str,
    section: &'static str,
    items: Vec<ItemCard>,
    tags: Vec<TagLink>,
    active_tag: Option<String>,
}

/// Renders a section listing.
///
/// # Endpoint
///
/// `GET /{section}?tag=`
///
/// Items within the listing tolerance window, newest first. The tag bar is
/// built from the tags of the listed items.
///
/// # Errors
///
/// Returns a 404 page for unknown sections.
pub async fn listing_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<ListingTemplate, PageError> {
    let kind: ContentKind = section.parse()?;
    let active_tag = query
        .tag
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let items = state
        .content_service
        .list_published(kind, active_tag.as_deref())
        .await?;

    let tags = collect_tags(items.iter().map(|item| item.tags.as_deref()));

    Ok(ListingTemplate {
        label: kind.plural_label(),
        section: kind.section(),
        tags: TagLink::list(kind, tags, active_tag.as_deref()),
        items: items.iter().map(ItemCard::from_item).collect(),
        active_tag,
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "detail.html")]
pub struct DetailTemplate {
    label: &'static str,
    section: &'static str,
    item: ItemView,
    related: Vec<ItemCard>,
}

/// Renders a single item with related items of the same kind.
///
/// # Endpoint
///
/// `GET /{section}/{slug}`
///
/// # Errors
///
/// Returns a 404 page for unknown slugs, drafts and items whose publish
/// time has not been reached yet.
pub async fn detail_handler(
    State(state): State<AppState>,
    Path((section, slug)): Path<(String, String)>,
) -> Result<DetailTemplate, PageError> {
    let kind: ContentKind = section.parse()?;
    let item = state.content_service.get_published(kind, &slug).await?;
    let related = state.content_service.related(&item).await?;

    Ok(DetailTemplate {
        label: kind.label(),
        section: kind.section(),
        item: ItemView::from_item(&item),
        related: related.iter().map(ItemCard::from_item).collect(),
    })
}
