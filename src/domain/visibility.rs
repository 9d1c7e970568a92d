//! Publication rules shared by every content type.
//!
//! Two questions are answered here and nowhere else:
//!
//! - **Is this item live?** [`is_visible`] is the strict check used by detail
//!   pages and related-item queries. Public listings use [`is_listed`], which
//!   accepts items up to a tolerance window in the future to absorb clock
//!   skew between the writer and the reader.
//! - **What publish timestamp should be stored?** [`resolve_publish_timestamp`]
//!   turns a submitted date/time into the value to persist: `None` for
//!   drafts, `now` for past or near-now submissions, the submitted instant
//!   for scheduled publishes.
//!
//! Every function is pure. "Now" is always passed in by the caller, usually
//! from a [`crate::domain::clock::Clock`].
//!
//! The listing tolerance is intentionally not applied to detail pages, so an
//! item can appear in a listing a few minutes before its own page resolves.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use thiserror::Error;

/// Default read-side tolerance for public listings.
pub const DEFAULT_LISTING_TOLERANCE_SECS: i64 = 5 * 60;

/// Default window around "now" inside which a submitted publish time
/// collapses to "publish immediately".
pub const DEFAULT_SNAP_WINDOW_SECS: i64 = 60;

/// Formats accepted for submissions without an explicit offset, in the order
/// they are tried. The first two are what `<input type="datetime-local">`
/// emits.
/// Offset-carrying shapes RFC 3339 rejects: no seconds, or a `+hhmm` offset.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Errors raised while resolving a submitted publish timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("invalid publish timestamp: {value:?}")]
    InvalidTimestamp { value: String },
}

/// Lifecycle state derived from a stored publish timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationStatus {
    /// No publish timestamp.
    Draft,
    /// Publish timestamp strictly in the future.
    Scheduled,
    /// Publish timestamp at or before now.
    Live,
}

impl PublicationStatus {
    pub fn of(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match published_at {
            None => PublicationStatus::Draft,
            Some(t) if t <= now => PublicationStatus::Live,
            Some(_) => PublicationStatus::Scheduled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PublicationStatus::Draft => "Draft",
            PublicationStatus::Scheduled => "Scheduled",
            PublicationStatus::Live => "Published",
        }
    }
}

/// Strict visibility: set and not in the future.
pub fn is_visible(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    published_at.is_some_and(|t| t <= now)
}

/// Latest publish timestamp a public listing still includes.
pub fn listing_cutoff(now: DateTime<Utc>, tolerance: Duration) -> DateTime<Utc> {
    now + tolerance
}

/// Listing visibility: set and not later than `now + tolerance`.
pub fn is_listed(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>, tolerance: Duration) -> bool {
    published_at.is_some_and(|t| t <= listing_cutoff(now, tolerance))
}

/// Resolves a submitted publish timestamp with the default policy.
///
/// See [`VisibilityPolicy::resolve_publish_timestamp`].
pub fn resolve_publish_timestamp(
    submitted: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, PublishError> {
    VisibilityPolicy::default().resolve_publish_timestamp(submitted, now)
}

/// Value to store when an item is unpublished.
pub fn unpublish() -> Option<DateTime<Utc>> {
    None
}

/// Value to store when an item is published immediately.
pub fn publish_now(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    Some(now)
}

/// Tunable parameters of the publication rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityPolicy {
    /// How far in the future a listed item may be scheduled.
    pub listing_tolerance: Duration,
    /// Submissions closer than this to now publish immediately.
    pub snap_window: Duration,
    /// Offset applied to submissions that carry no offset of their own.
    pub local_offset: FixedOffset,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            listing_tolerance: Duration::seconds(DEFAULT_LISTING_TOLERANCE_SECS),
            snap_window: Duration::seconds(DEFAULT_SNAP_WINDOW_SECS),
            local_offset: Utc.fix(),
        }
    }
}

impl VisibilityPolicy {
    pub fn new(listing_tolerance: Duration, snap_window: Duration, local_offset: FixedOffset) -> Self {
        Self {
            listing_tolerance,
            snap_window,
            local_offset,
        }
    }

    pub fn is_listed(&self, published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        is_listed(published_at, now, self.listing_tolerance)
    }

    pub fn listing_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        listing_cutoff(now, self.listing_tolerance)
    }

    /// Decides which publish timestamp to persist for a submitted value.
    ///
    /// - absent, empty or blank → `Ok(None)` (draft)
    /// - at or before `now`, or less than `snap_window` after it → `Ok(Some(now))`
    /// - otherwise → `Ok(Some(t))` (scheduled)
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidTimestamp`] when the value is neither
    /// RFC 3339, an offset date/time without seconds or with a `+hhmm`
    /// offset, nor one of the naive date/time shapes a browser form emits.
    pub fn resolve_publish_timestamp(
        &self,
        submitted: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, PublishError> {
        let Some(raw) = submitted.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let t = self.parse_instant(raw)?;
        Ok(Some(self.snap(t, now)))
    }

    /// Collapses past and near-now instants onto `now`.
    fn snap(&self, t: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
        // t > now past the first test, so t - now is the absolute distance.
        if t <= now || t - now < self.snap_window {
            now
        } else {
            t
        }
    }

    fn parse_instant(&self, raw: &str) -> Result<DateTime<Utc>, PublishError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Some(dt) = OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        {
            return Ok(dt.with_timezone(&Utc));
        }

        let naive = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| invalid(raw))?;

        self.local_offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| invalid(raw))
    }
}

fn invalid(raw: &str) -> PublishError {
    PublishError::InvalidTimestamp {
        value: raw.to_string(),
    }
}
