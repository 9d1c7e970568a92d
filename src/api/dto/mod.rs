//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. [`content::ContentRequest`] is shared with the admin
//! HTML forms.

pub mod content;
pub mod convert;
pub mod health;
