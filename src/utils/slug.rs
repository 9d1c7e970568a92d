//! URL slug generation for content titles.

/// Generates a URL slug from a title.
///
/// Lowercases the text, drops every character that is not an ASCII word
/// character (`[A-Za-z0-9_]`), whitespace or `-`, turns whitespace runs into
/// a single hyphen, collapses hyphen runs and trims hyphens from both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Rust -- Ownership  "), "rust-ownership");
/// assert_eq!(slugify("snake_case stays"), "snake_case-stays");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                Some(c)
            } else if c.is_whitespace() || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
