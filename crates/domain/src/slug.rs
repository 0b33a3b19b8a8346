//! URL slug generation for catalog products

/// Convert a title to a URL-friendly slug (lowercase, hyphens, no
/// leading/trailing hyphen). Non-ASCII characters are dropped.
pub fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut last_was_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator && !result.is_empty() {
            result.push('-');
            last_was_separator = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Slug for a catalog product, falling back to a dedupe-key form when the
/// title contains no ASCII alphanumerics (e.g. CJK-only titles).
pub fn slug_for(title: &str, dedupe_key: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        let prefix: String = dedupe_key.chars().take(12).collect();
        format!("item-{}", prefix)
    } else {
        slug
    }
}
