//! Comma-separated tag handling.
//!
//! Tags are stored as one free-form comma-separated string per item. They are
//! split into tokens only for display. Filtering works on the raw string, so a
//! filter of `art` also matches an item tagged `smart`.

use std::collections::BTreeSet;

/// Splits a stored tag string into trimmed, non-empty tokens in stored order.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Builds the tag bar for a listing: every tag of every item, deduplicated
/// and sorted.
pub fn collect_tags<'a, I>(raw_tags: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    raw_tags
        .into_iter()
        .flat_map(parse_tags)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Case-insensitive substring match of `filter` against the raw tag string.
pub fn matches_tag_filter(raw: Option<&str>, filter: &str) -> bool {
    raw.is_some_and(|s| s.to_lowercase().contains(&filter.to_lowercase()))
}

/// Case-sensitive substring match, used to find related items.
pub fn contains_tag(raw: Option<&str>, tag: &str) -> bool {
    raw.is_some_and(|s| s.contains(tag))
}
