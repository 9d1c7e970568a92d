//! Business logic services for the application layer.

pub mod auth_service;
pub mod content_service;

pub use auth_service::{AuthService, hash_token};
pub use content_service::{ContentInput, ContentService};
