//! Repository implementations.
//!
//! The PostgreSQL repositories use runtime-checked SQLx queries because the
//! content table name is chosen per [`crate::domain::entities::ContentKind`].
//!
//! - [`PgContentRepository`] - content storage in one table per kind
//! - [`PgTokenRepository`] - admin token storage and validation
//! - [`InMemoryContentRepository`] - process-local content store

pub mod memory;
pub mod pg_content_repository;
pub mod pg_token_repository;

pub use memory::InMemoryContentRepository;
pub use pg_content_repository::PgContentRepository;
pub use pg_token_repository::PgTokenRepository;
