#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};

use folio::api;
use folio::api::handlers::health_handler;
use folio::api::middleware::auth;
use folio::application::services::{AuthService, ContentInput, ContentService, hash_token};
use folio::domain::clock::{Clock, FixedClock};
use folio::domain::entities::{AdminToken, ContentItem, ContentKind};
use folio::domain::repositories::{ContentRepository, TokenRepository};
use folio::domain::visibility::VisibilityPolicy;
use folio::error::AppError;
use folio::infrastructure::persistence::InMemoryContentRepository;
use folio::state::AppState;
use folio::web;
use folio::web::middleware::web_auth;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789";
pub const ADMIN_COOKIE: &str = "auth_token=test-admin-token-0123456789";

/// Frozen "now" shared by every handler test.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
}

/// Token store holding a single active token, [`ADMIN_TOKEN`].
pub struct TestTokenRepository {
    tokens: Mutex<Vec<AdminToken>>,
}

impl TestTokenRepository {
    pub fn new() -> Self {
        let token = AdminToken {
            id: 1,
            name: "test".to_string(),
            token_hash: hash_token(SIGNING_SECRET, ADMIN_TOKEN),
            created_at: now(),
            last_used_at: None,
            revoked_at: None,
        };
        Self {
            tokens: Mutex::new(vec![token]),
        }
    }
}

#[async_trait]
impl TokenRepository for TestTokenRepository {
    async fn validate_token(&self, token_hash: &str) -> Result<bool, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .any(|t| t.token_hash == token_hash && t.revoked_at.is_none()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(t) = tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            t.last_used_at = Some(now());
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<AdminToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = AdminToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<AdminToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AdminToken>, AppError> {
        Ok(self.tokens.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<AdminToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id && t.revoked_at.is_none()) {
            Some(t) => {
                t.revoked_at = Some(now());
                Ok(())
            }
            None => Err(AppError::not_found("Token not found", json!({ "id": id }))),
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub clock: Arc<FixedClock>,
    pub content: Arc<ContentService<dyn ContentRepository>>,
}

impl TestApp {
    /// Stores an item directly through the service, bypassing HTTP.
    pub async fn seed(
        &self,
        kind: ContentKind,
        title: &str,
        tags: Option<&str>,
        published_at: Option<DateTime<Utc>>,
    ) -> ContentItem {
        let item = self
            .content
            .create(
                kind,
                ContentInput {
                    title: title.to_string(),
                    tags: tags.map(str::to_string),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Drafts are created first so any timestamp, past or future, can be
        // stored verbatim without going through the snap window.
        match published_at {
            Some(at) => {
                let live_at = self.clock.now();
                self.clock.set(at);
                let item = self.content.publish_now(kind, item.id).await.unwrap();
                self.clock.set(live_at);
                item
            }
            None => item,
        }
    }
}

/// Full route table without rate limiting; the governor layer needs a
/// peer address that the in-process test transport does not provide.
pub fn test_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let admin_router = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .merge(web::routes::public_routes());

    web::routes::site_routes()
        .route("/health", get(health_handler))
        .nest("/admin", admin_router)
        .nest("/api", api_router)
        .with_state(state)
}

pub fn test_app() -> TestApp {
    test_app_with_policy(VisibilityPolicy::default())
}

pub fn test_app_with_policy(policy: VisibilityPolicy) -> TestApp {
    let clock = Arc::new(FixedClock::new(now()));
    let shared_clock: Arc<dyn Clock> = clock.clone();

    let content_repo: Arc<dyn ContentRepository> =
        Arc::new(InMemoryContentRepository::new(shared_clock.clone()));
    let token_repo: Arc<dyn TokenRepository> = Arc::new(TestTokenRepository::new());

    let content = Arc::new(ContentService::new(content_repo, shared_clock, policy));
    let auth = Arc::new(AuthService::new(token_repo, SIGNING_SECRET.to_string()));

    let state = AppState::new(content.clone(), auth, false);
    let server = TestServer::new(test_router(state)).unwrap();

    TestApp {
        server,
        clock,
        content,
    }
}

pub fn minutes(n: i64) -> Duration {
    Duration::minutes(n)
}
