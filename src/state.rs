//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, ContentService};
use crate::domain::repositories::{ContentRepository, TokenRepository};

/// Handles to the services behind the HTTP layer.
///
/// Cloned per request; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub content_service: Arc<ContentService<dyn ContentRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    /// Adds `Secure` to the admin `auth_token` cookie.
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(
        content_service: Arc<ContentService<dyn ContentRepository>>,
        auth_service: Arc<AuthService<dyn TokenRepository>>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            content_service,
            auth_service,
            cookie_secure,
        }
    }
}
