//! HTTP request/response tracing middleware.

use axum::{body::Body, http::Request};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeRequestSpan = fn(&Request<Body>) -> Span;

/// Creates the request tracing layer.
///
/// Every request gets an `INFO` span carrying the method, the path without
/// its query string and the first path segment as `area` (`articles`,
/// `admin`, `api`, `static`, ...). Responses are logged at `INFO` with
/// status and latency in milliseconds; 5xx responses are also logged as
/// failures.
///
/// ```text
/// INFO request{method=GET path=/articles area=articles}: finished processing request latency=3 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeRequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeRequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn request_span(req: &Request<Body>) -> Span {
    let path = req.uri().path();
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %path,
        area = area(path),
    )
}

/// First segment of `path`, or `home` for the root.
fn area(path: &str) -> &str {
    match path.trim_start_matches('/').split('/').next() {
        Some("") | None => "home",
        Some(segment) => segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area() {
        assert_eq!(area("/"), "home");
        assert_eq!(area("/articles"), "articles");
        assert_eq!(area("/admin/projects/3"), "admin");
        assert_eq!(area("/api/content/research"), "api");
    }
}
