//! Admin access token entity.

use chrono::{DateTime, Utc};

/// Admin access token with metadata.
///
/// Only the HMAC-SHA256 digest of the raw token is stored.
#[derive(Debug, Clone)]
pub struct AdminToken {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl AdminToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}
