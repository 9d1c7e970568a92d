//! Admin dashboard handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::state::AppState;
use crate::web::error::PageError;
use crate::web::view::CountRow;

/// Template for the dashboard page.
///
/// Renders `templates/admin/dashboard.html` with one row of status counts
/// per content kind.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    rows: Vec<CountRow>,
}

/// Renders the dashboard.
///
/// `GET /admin`
pub async fn dashboard_handler(
    State(state): State<AppState>,
) -> Result<DashboardTemplate, PageError> {
    let rows = state
        .content_service
        .counts()
        .await?
        .into_iter()
        .map(|(kind, counts)| CountRow {
            label: kind.plural_label(),
            section: kind.section(),
            counts,
        })
        .collect();

    Ok(DashboardTemplate { rows })
}
