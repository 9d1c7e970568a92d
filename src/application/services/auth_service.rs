//! Authentication service for admin token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::AdminToken;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI and the
/// service both go through this function, so tokens created by one verify
/// in the other.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating admin requests.
///
/// The same token works as an API `Bearer` credential and as the admin
/// panel's `auth_token` cookie. An attacker with read-only access to the
/// database cannot verify or forge tokens without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    fn hash_token(&self, token: &str) -> String {
        hash_token(&self.signing_secret, token)
    }

    /// Authenticates a raw token against stored credentials.
    ///
    /// On success the token's `last_used_at` is touched. A failure to record
    /// usage does not fail the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for empty, unknown or revoked tokens.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        if token.trim().is_empty() {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Missing token"}),
            ));
        }

        let token_hash = self.hash_token(token);

        let is_valid = self.repository.validate_token(&token_hash).await?;

        if !is_valid {
            tracing::warn!("Rejected admin token");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        }

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to record token usage");
        }

        Ok(())
    }

    /// Stores a new token under `name` and returns its metadata.
    pub async fn create_token(&self, name: &str, raw_token: &str) -> Result<AdminToken, AppError> {
        let token = self
            .repository
            .create_token(name, &self.hash_token(raw_token))
            .await?;
        tracing::info!(id = token.id, name = %token.name, "Admin token created");

        Ok(token)
    }

    pub async fn list_tokens(&self) -> Result<Vec<AdminToken>, AppError> {
        self.repository.list_tokens().await
    }

    /// Revokes a token by numeric id or by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no token matches.
    pub async fn revoke(&self, id_or_name: &str) -> Result<AdminToken, AppError> {
        let token = match id_or_name.parse::<i64>() {
            Ok(id) => self.repository.find_by_id(id).await?,
            Err(_) => self.repository.find_by_name(id_or_name).await?,
        }
        .ok_or_else(|| {
            AppError::not_found("Token not found", json!({ "token": id_or_name }))
        })?;

        self.repository.revoke_token(token.id).await?;
        tracing::info!(id = token.id, name = %token.name, "Admin token revoked");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenRepository;
    use chrono::Utc;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn compute_expected_hash(token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(test_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn token(id: i64, name: &str) -> AdminToken {
        AdminToken {
            id,
            name: name.to_string(),
            token_hash: "h".repeat(64),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockTokenRepository::new();

        let token = "valid-token";
        let expected_hash = compute_expected_hash(token);

        mock_repo
            .expect_validate_token()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(true));

        mock_repo
            .expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let result = service.authenticate(token).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut mock_repo = MockTokenRepository::new();

        mock_repo
            .expect_validate_token()
            .times(1)
            .returning(|_| Ok(false));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let result = service.authenticate("invalid-token").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_empty_token_skips_lookup() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo.expect_validate_token().times(0);

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let result = service.authenticate("  ").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_survives_usage_update_failure() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo.expect_validate_token().returning(|_| Ok(true));
        mock_repo
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        assert!(service.authenticate("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_token_stores_hash() {
        let mut mock_repo = MockTokenRepository::new();
        let expected_hash = compute_expected_hash("raw-token");

        mock_repo
            .expect_create_token()
            .withf(move |name, hash| name == "ci" && hash == expected_hash)
            .times(1)
            .returning(|name, _| Ok(token(1, name)));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let created = service.create_token("ci", "raw-token").await.unwrap();

        assert_eq!(created.name, "ci");
    }

    #[tokio::test]
    async fn test_revoke_by_id_and_name() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_find_by_id()
            .withf(|id| *id == 4)
            .returning(|id| Ok(Some(token(id, "laptop"))));
        mock_repo
            .expect_find_by_name()
            .withf(|name| name == "laptop")
            .returning(|name| Ok(Some(token(4, name))));
        mock_repo
            .expect_revoke_token()
            .withf(|id| *id == 4)
            .times(2)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        assert_eq!(service.revoke("4").await.unwrap().name, "laptop");
        assert_eq!(service.revoke("laptop").await.unwrap().id, 4);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo.expect_find_by_name().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let result = service.revoke("ghost").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = hash_token(&test_secret(), "test-token");
        let hash2 = hash_token(&test_secret(), "test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_eq!(hash1, compute_expected_hash("test-token"));
    }

    #[test]
    fn test_hash_token_different_inputs() {
        assert_ne!(
            hash_token(&test_secret(), "token1"),
            hash_token(&test_secret(), "token2")
        );
    }

    #[test]
    fn test_hash_token_secret_matters() {
        assert_ne!(hash_token("secret-a", "token"), hash_token("secret-b", "token"));
    }
}
