//! Site and admin panel route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    admin_list_handler, convert_page_handler, convert_submit_handler, create_handler,
    dashboard_handler, detail_handler, edit_handler, home_handler, listing_handler,
    login_handler, login_submit_handler, logout_handler, new_handler, publish_handler,
    unpublish_handler, update_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public site pages.
///
/// # Endpoints
///
/// - `GET /` - Home page with the newest items of every section
/// - `GET /{section}` - Section listing, optional `?tag=` filter
/// - `GET /{section}/{slug}` - Item detail
pub fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/{section}", get(listing_handler))
        .route("/{section}/{slug}", get(detail_handler))
}

/// Admin pages requiring authentication, mounted under `/admin`.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /` - Dashboard with counts per section
/// - `GET  /convert`, `POST /convert` - Math converter
/// - `GET  /{section}` - Item table
/// - `POST /{section}` - Create
/// - `GET  /{section}/new` - Empty editor
/// - `GET  /{section}/{id}`, `POST /{section}/{id}` - Edit
/// - `POST /{section}/{id}/unpublish`, `POST /{section}/{id}/publish`
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handler))
        .route(
            "/convert",
            get(convert_page_handler).post(convert_submit_handler),
        )
        .route(
            "/{section}",
            get(admin_list_handler).post(create_handler),
        )
        .route("/{section}/new", get(new_handler))
        .route("/{section}/{id}", get(edit_handler).post(update_handler))
        .route("/{section}/{id}/unpublish", post(unpublish_handler))
        .route("/{section}/{id}/publish", post(publish_handler))
}

/// Admin pages reachable without a session, mounted under `/admin`.
///
/// # Endpoints
///
/// - `GET /login`, `POST /login` - Login form
/// - `POST /logout` - Clear the session cookie
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_handler).post(login_submit_handler))
        .route("/logout", post(logout_handler))
}
