//! Server-rendered HTML: the public site and the admin panel.
//!
//! Uses Askama templates from `templates/` rendered through `askama_web`.
//!
//! # Modules
//!
//! - [`error`] - HTML error pages
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Cookie authentication for the admin panel
//! - [`routes`] - Site and admin route configuration
//! - [`view`] - Template-facing view models

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod view;
