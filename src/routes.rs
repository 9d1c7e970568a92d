//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`                  - Home page (public)
//! - `GET  /{section}`         - Listings (public)
//! - `GET  /{section}/{slug}`  - Item pages (public)
//! - `GET  /health`            - Health check: database (public)
//! - `/admin/*`                - Admin panel (cookie session required)
//! - `/api/*`                  - REST API (Bearer token required)
//! - `/static/*`               - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for admin and API
//! - **Authentication** - Bearer token (API) or cookie session (admin)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::RateLimit;
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `static_dir` - directory served under `/static`
pub fn app_router(state: AppState, static_dir: &str) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(RateLimit::ADMIN.layer());

    let admin_protected = web::routes::protected_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), web_auth::layer),
    );

    let admin_router = Router::new()
        .merge(admin_protected)
        .merge(web::routes::public_routes())
        .layer(RateLimit::ADMIN.layer());

    let site_router = web::routes::site_routes()
        .route("/health", get(health_handler))
        .layer(RateLimit::SITE.layer());

    let router = Router::new()
        .merge(site_router)
        .nest("/admin", admin_router)
        .nest("/api", api_router)
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
