// Slug derivation - URL-safe identifiers computed once from human-readable titles

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("slug character class is valid"));
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("slug separator class is valid"));
static VALID_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"));

/// Fold accents (NFKD, then drop what is still non-ASCII), lowercase, drop
/// anything that is not ASCII alphanumeric, underscore,
/// whitespace or hyphen, collapse whitespace/hyphen runs into a single hyphen
/// and strip leading/trailing hyphens and underscores.
pub fn slugify(value: &str) -> String {
    let ascii: String = value
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_ascii_lowercase();
    let cleaned = DISALLOWED.replace_all(&ascii, "");
    let hyphenated = SEPARATORS.replace_all(cleaned.trim(), "-");
    hyphenated
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}

/// Slug for a new entity. An explicit slug wins verbatim; otherwise the
/// title is slugified, prefixed by the parent's slug for scoped kinds.
pub fn derive_slug(explicit: Option<&str>, scope_prefix: Option<&str>, title: &str) -> String {
    match explicit.map(str::trim).filter(|slug| !slug.is_empty()) {
        Some(slug) => slug.to_string(),
        None => match scope_prefix {
            Some(prefix) => slugify(&format!("{}-{}", prefix, title)),
            None => slugify(title),
        },
    }
}

pub fn is_valid_slug(value: &str) -> bool {
    VALID_SLUG.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic_titles() {
        assert_eq!(slugify("Go"), "go");
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  Rust   for  Beginners "), "rust-for-beginners");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("C# & .NET: The Basics!"), "c-net-the-basics");
        assert_eq!(slugify("--already-hyphenated--"), "already-hyphenated");
        assert_eq!(slugify("snake_case_title"), "snake_case_title");
        assert_eq!(slugify("_leading underscore_"), "leading-underscore");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Café Basics"), "cafe-basics");
        assert_eq!(slugify("Señor Rust"), "senor-rust");
        assert_eq!(slugify("naïve 日本 tips"), "naive-tips");
        assert_eq!(slugify("ﬁle Ⅻ"), "file-xii");
    }

    #[test]
    fn test_slugify_drops_unfoldable_characters() {
        assert_eq!(slugify("日本"), "");
        assert_eq!(derive_slug(None, Some("go"), "Écoles ✓"), "go-ecoles");
    }

    #[test]
    fn test_derive_slug_scoped_kind() {
        assert_eq!(
            derive_slug(None, Some("go"), "Getting Started"),
            "go-getting-started"
        );
    }

    #[test]
    fn test_derive_slug_preserves_explicit_value() {
        assert_eq!(
            derive_slug(Some("My_Custom-Slug"), Some("go"), "Getting Started"),
            "My_Custom-Slug"
        );
        // A blank explicit slug falls back to derivation.
        assert_eq!(derive_slug(Some("  "), None, "Go"), "go");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("go-getting-started"));
        assert!(is_valid_slug("Mixed_Case-1"));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug("slash/inside"));
        assert!(!is_valid_slug(""));
    }
}
