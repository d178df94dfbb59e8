//! Board identifier derivation.

/// Derive a URL-safe slug from a display name: lowercase, whitespace to
/// hyphens, everything else outside ASCII alphanumerics stripped, repeated
/// hyphens collapsed, leading and trailing hyphens trimmed.
///
/// Different names can derive the same slug ("Sprint 1" and "sprint 1");
/// creation detects and rejects the collision. An empty result means the
/// name has no usable characters and is invalid.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars() {
        let mapped = if ch.is_whitespace() || ch == '-' {
            '-'
        } else if ch.is_ascii_alphanumeric() {
            ch
        } else {
            continue;
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }
    slug.trim_matches('-').to_string()
}
