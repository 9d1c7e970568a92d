//! Core domain entities.
//!
//! - [`ContentItem`] - An article, research note, project or website
//! - [`ContentFields`] - Editable fields used for creation and full updates
//! - [`AdminToken`] - Credential for the admin panel and API
//!
//! Entities are plain data structures. Publication rules live in
//! [`crate::domain::visibility`].

pub mod content;
pub mod token;

pub use content::{ContentFields, ContentItem, ContentKind, Media};
pub use token::AdminToken;
