//! Per-IP rate limiting for the site, the admin panel and the API.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Governor layer keyed by the socket peer address.
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Token bucket parameters: sustained rate and burst size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

impl RateLimit {
    /// Public pages and `/health`. Readers browsing listings and
    /// following related links stay well below the burst.
    pub const SITE: RateLimit = RateLimit {
        per_second: 2,
        burst: 100,
    };

    /// Admin panel and JSON API. Also slows down token guessing on
    /// `POST /admin/login`.
    pub const ADMIN: RateLimit = RateLimit {
        per_second: 1,
        burst: 10,
    };

    /// Builds the layer. Requests over the limit get `429 Too Many Requests`.
    ///
    /// The layer needs the peer address, so the server must be started with
    /// `into_make_service_with_connect_info::<SocketAddr>()`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let api = api::routes::protected_routes().layer(RateLimit::ADMIN.layer());
    /// ```
    pub fn layer(self) -> RateLimitLayer {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(self.per_second)
                .burst_size(self.burst)
                .finish()
                .unwrap(),
        );

        GovernorLayer::new(governor_conf)
    }
}
