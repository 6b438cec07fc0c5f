//! Slug shape rules.
//!
//! Slugs are chosen by the administrator rather than derived from the
//! title, so the only guarantee the domain can give is that an accepted
//! slug is safe to embed in a URL path segment unescaped.

/// Returns true when `slug` is non-empty and consists solely of lowercase
/// ASCII letters, digits, and interior hyphens.
pub fn is_url_safe(slug: &str) -> bool {
    if slug.is_empty() || slug.starts_with('-') || slug.ends_with('-') {
        return false;
    }

    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
