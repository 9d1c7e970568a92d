//! Handler for the health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{
    CheckState, CheckStatus, HealthChecks, HealthResponse, PublishingSettings, ServiceStatus,
};
use crate::state::AppState;

/// Reports database reachability and the publication settings in effect.
///
/// # Endpoint
///
/// `GET /health`
///
/// `200 OK` when the database answers, `503 Service Unavailable` otherwise.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "now": "2026-10-17T12:00:00Z",
///   "publishing": {
///     "listing_tolerance_secs": 300,
///     "snap_window_secs": 60,
///     "admin_utc_offset": "+00:00"
///   },
///   "checks": { "database": { "status": "ok", "message": "Connected" } }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.content_service.ping().await {
        Ok(()) => CheckStatus {
            status: CheckState::Ok,
            message: Some("Connected".to_string()),
        },
        Err(e) => CheckStatus {
            status: CheckState::Error,
            message: Some(format!("Database error: {}", e)),
        },
    };

    let (code, status) = match database.status {
        CheckState::Ok => (StatusCode::OK, ServiceStatus::Healthy),
        CheckState::Error => (StatusCode::SERVICE_UNAVAILABLE, ServiceStatus::Degraded),
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        now: state.content_service.now(),
        publishing: PublishingSettings::from(state.content_service.policy()),
        checks: HealthChecks { database },
    };

    (code, Json(response))
}
