mod common;

use chrono::{Duration, FixedOffset};
use common::{test_app, test_app_with_policy};
use folio::domain::visibility::VisibilityPolicy;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["now"], "2026-10-17T12:00:00Z");
}

#[tokio::test]
async fn test_health_reports_publishing_settings() {
    let policy = VisibilityPolicy::new(
        Duration::seconds(120),
        Duration::seconds(30),
        FixedOffset::east_opt(2 * 3600).unwrap(),
    );
    let app = test_app_with_policy(policy);

    let json = app.server.get("/health").await.json::<Value>();

    assert_eq!(json["publishing"]["listing_tolerance_secs"], 120);
    assert_eq!(json["publishing"]["snap_window_secs"], 30);
    assert_eq!(json["publishing"]["admin_utc_offset"], "+02:00");
}
