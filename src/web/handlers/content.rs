//! Admin content tables and the editor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use validator::Validate;

use crate::api::dto::content::ContentRequest;
use crate::domain::entities::{ContentItem, ContentKind};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::error::PageError;
use crate::web::view::{AdminRow, EditorForm, form_error_message};

#[derive(Template, WebTemplate)]
#[template(path = "admin/list.html")]
pub struct AdminListTemplate {
    label: &'static str,
    section: &'static str,
    rows: Vec<AdminRow>,
}

/// Renders every item of a section with its status badge.
///
/// `GET /admin/{section}`
pub async fn admin_list_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<AdminListTemplate, PageError> {
    let kind: ContentKind = section.parse()?;
    let now = state.content_service.now();
    let items = state.content_service.list_all(kind).await?;

    Ok(AdminListTemplate {
        label: kind.plural_label(),
        section: kind.section(),
        rows: items.iter().map(|item| AdminRow::from_item(item, now)).collect(),
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/editor.html")]
pub struct EditorTemplate {
    label: &'static str,
    section: &'static str,
    /// `None` while creating.
    id: Option<i64>,
    action: String,
    form: EditorForm,
    error: Option<String>,
    status: Option<&'static str>,
    view_path: Option<String>,
    offset_label: String,
}

impl EditorTemplate {
    fn new(state: &AppState, kind: ContentKind, form: EditorForm) -> Self {
        EditorTemplate {
            label: kind.label(),
            section: kind.section(),
            id: None,
            action: format!("/admin/{}", kind.section()),
            form,
            error: None,
            status: None,
            view_path: None,
            offset_label: format!("UTC{}", state.content_service.policy().local_offset),
        }
    }

    fn for_item(state: &AppState, item: &ContentItem, form: EditorForm) -> Self {
        let now = state.content_service.now();
        EditorTemplate {
            id: Some(item.id),
            action: format!("/admin/{}/{}", item.kind.section(), item.id),
            status: Some(item.status(now).label()),
            view_path: item.is_visible(now).then(|| item.path()),
            ..Self::new(state, item.kind, form)
        }
    }

    fn with_error(mut self, err: &AppError) -> Self {
        self.error = Some(form_error_message(err));
        self
    }
}

/// Errors the editor shows above the form instead of an error page.
fn is_form_error(err: &AppError) -> bool {
    matches!(err, AppError::Validation { .. } | AppError::Conflict { .. })
}

fn list_redirect(kind: ContentKind) -> Redirect {
    Redirect::to(&format!("/admin/{}", kind.section()))
}

/// Renders an empty editor.
///
/// `GET /admin/{section}/new`
pub async fn new_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<EditorTemplate, PageError> {
    let kind: ContentKind = section.parse()?;

    Ok(EditorTemplate::new(&state, kind, EditorForm::default()))
}

/// Renders the editor prefilled with a stored item.
///
/// `GET /admin/{section}/{id}`
pub async fn edit_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
) -> Result<EditorTemplate, PageError> {
    let kind: ContentKind = section.parse()?;
    let item = state.content_service.get(kind, id).await?;
    let form = EditorForm::from_item(&item, state.content_service.policy().local_offset);

    Ok(EditorTemplate::for_item(&state, &item, form))
}

/// Creates an item from the editor form.
///
/// # Endpoint
///
/// `POST /admin/{section}`
///
/// Redirects to the section table on success. Validation failures, slug
/// conflicts and unparseable publish dates re-render the form with the
/// submitted values.
pub async fn create_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Form(payload): Form<ContentRequest>,
) -> Result<Response, PageError> {
    let kind: ContentKind = section.parse()?;
    let payload = payload.normalized();

    let result = match payload.validate() {
        Ok(()) => {
            state
                .content_service
                .create(kind, payload.clone().into_input())
                .await
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(_) => Ok(list_redirect(kind).into_response()),
        Err(e) if is_form_error(&e) => {
            let page = EditorTemplate::new(&state, kind, EditorForm::from_request(&payload))
                .with_error(&e);
            Ok((e.status_code(), page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Saves the editor form over an existing item.
///
/// # Endpoint
///
/// `POST /admin/{section}/{id}`
///
/// The publish date is resolved again on every save.
pub async fn update_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
    Form(payload): Form<ContentRequest>,
) -> Result<Response, PageError> {
    let kind: ContentKind = section.parse()?;
    let item = state.content_service.get(kind, id).await?;
    let payload = payload.normalized();

    let result = match payload.validate() {
        Ok(()) => {
            state
                .content_service
                .update(kind, id, payload.clone().into_input())
                .await
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(_) => Ok(list_redirect(kind).into_response()),
        Err(e) if is_form_error(&e) => {
            let page = EditorTemplate::for_item(&state, &item, EditorForm::from_request(&payload))
                .with_error(&e);
            Ok((e.status_code(), page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `POST /admin/{section}/{id}/unpublish`
pub async fn unpublish_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
) -> Result<Redirect, PageError> {
    let kind: ContentKind = section.parse()?;
    state.content_service.unpublish(kind, id).await?;

    Ok(list_redirect(kind))
}

/// `POST /admin/{section}/{id}/publish`
pub async fn publish_handler(
    State(state): State<AppState>,
    Path((section, id)): Path<(String, i64)>,
) -> Result<Redirect, PageError> {
    let kind: ContentKind = section.parse()?;
    state.content_service.publish_now(kind, id).await?;

    Ok(list_redirect(kind))
}
