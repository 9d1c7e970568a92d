//! Repository trait definitions for the domain layer.
//!
//! The traits abstract data access; PostgreSQL and in-memory implementations
//! live in `crate::infrastructure::persistence`. Mock implementations are
//! generated with `mockall` for unit tests.
//!
//! - [`ContentRepository`] - content items of every kind
//! - [`TokenRepository`] - admin token authentication
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod content_repository;
pub mod token_repository;

pub use content_repository::{ContentCounts, ContentRepository};
pub use token_repository::TokenRepository;

#[cfg(test)]
pub use content_repository::MockContentRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
