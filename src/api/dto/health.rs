//! DTOs for the health check endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::visibility::VisibilityPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    /// The server clock that decides what is published.
    pub now: DateTime<Utc>,
    pub publishing: PublishingSettings,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: CheckState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Active publication windows, to explain why an item is or is not listed.
#[derive(Debug, Serialize)]
pub struct PublishingSettings {
    pub listing_tolerance_secs: i64,
    pub snap_window_secs: i64,
    /// Offset applied to publish dates entered without one, e.g. `+02:00`.
    pub admin_utc_offset: String,
}

impl From<&VisibilityPolicy> for PublishingSettings {
    fn from(policy: &VisibilityPolicy) -> Self {
        Self {
            listing_tolerance_secs: policy.listing_tolerance.num_seconds(),
            snap_window_secs: policy.snap_window.num_seconds(),
            admin_utc_offset: policy.local_offset.to_string(),
        }
    }
}
