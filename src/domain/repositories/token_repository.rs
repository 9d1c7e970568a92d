//! Repository trait for admin token authentication.

use crate::domain::entities::AdminToken;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for admin token management.
///
/// Tokens are stored as keyed HMAC-SHA256 hashes, never in plain text.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_token.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Validates a token hash against stored credentials.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the token exists and is not revoked
    /// - `Ok(false)` otherwise
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn validate_token(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Updates the last_used timestamp for a token.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Creates a new admin token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or hash already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_token(&self, name: &str, token_hash: &str) -> Result<AdminToken, AppError>;

    async fn list_tokens(&self) -> Result<Vec<AdminToken>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<AdminToken>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<AdminToken>, AppError>;

    /// Revokes a token, preventing further authentication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token does not exist or is
    /// already revoked.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
