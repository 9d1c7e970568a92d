//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    convert_handler, create_content_handler, get_content_handler, list_content_handler,
    publish_content_handler, unpublish_content_handler, update_content_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /content/{section}`                - All items of a section
/// - `POST /content/{section}`                - Create an item
/// - `GET  /content/{section}/{id}`           - One item by id
/// - `PUT  /content/{section}/{id}`           - Replace an item's fields
/// - `POST /content/{section}/{id}/unpublish` - Back to draft
/// - `POST /content/{section}/{id}/publish`   - Publish now
/// - `POST /convert`                          - Legacy math to LaTeX
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/content/{section}",
            get(list_content_handler).post(create_content_handler),
        )
        .route(
            "/content/{section}/{id}",
            get(get_content_handler).put(update_content_handler),
        )
        .route(
            "/content/{section}/{id}/unpublish",
            post(unpublish_content_handler),
        )
        .route(
            "/content/{section}/{id}/publish",
            post(publish_content_handler),
        )
        .route("/convert", post(convert_handler))
}
