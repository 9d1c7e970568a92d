//! Application layer services implementing business logic.
//!
//! Services consume repository traits, apply the publication rules and
//! provide a narrow API for HTTP handlers and the admin CLI.
//!
//! - [`services::content_service::ContentService`] - public reads and admin edits of content
//! - [`services::auth_service::AuthService`] - admin token authentication

pub mod services;
