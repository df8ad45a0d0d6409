//! Pure slug and lookup-key generation.
//!
//! Slugs name output files; lookup keys match names across the index
//! regardless of case, punctuation or spacing.

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Generate a filesystem- and URL-safe slug from a display name.
///
/// Lowercases, drops characters that are neither alphanumeric nor hyphens,
/// collapses whitespace and hyphen runs into single hyphens, truncates to
/// [`MAX_SLUG_LEN`] characters and trims edge hyphens.
///
/// # Examples
///
/// ```
/// use grimoire::markdown::slugify;
///
/// assert_eq!(slugify("Acid Splash!"), "acid-splash");
/// assert_eq!(slugify("Bigby's Hand"), "bigbys-hand");
/// assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
/// ```
pub fn slugify(text: &str) -> String {
    let collapsed = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' {
                '-'
            } else {
                // Skip other characters
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    collapsed
        .chars()
        .take(MAX_SLUG_LEN)
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}

/// Normalize a name into an index lookup key.
///
/// Case-folded, punctuation stripped, whitespace collapsed to single spaces.
///
/// # Examples
///
/// ```
/// use grimoire::markdown::normalize_key;
///
/// assert_eq!(normalize_key("  Acid   Splash! "), "acid splash");
/// assert_eq!(normalize_key("Bigby's Hand"), "bigbys hand");
/// ```
pub fn normalize_key(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_with_punctuation() {
        assert_eq!(slugify("Acid Splash!"), "acid-splash");
        assert_eq!(slugify("Tasha's Hideous Laughter"), "tashas-hideous-laughter");
    }

    #[test]
    fn test_slugify_strips_underscores() {
        assert_eq!(slugify("hello_world"), "helloworld");
    }

    #[test]
    fn test_slugify_leading_trailing_spaces() {
        assert_eq!(slugify("  Hello World  "), "hello-world");
    }

    #[test]
    fn test_slugify_hyphens() {
        assert_eq!(slugify("hello--world"), "hello-world");
        assert_eq!(slugify("-hello-"), "hello");
        assert_eq!(slugify("Half-Orc"), "half-orc");
    }

    #[test]
    fn test_slugify_truncates() {
        let name = "a".repeat(80);
        assert_eq!(slugify(&name).len(), MAX_SLUG_LEN);

        // Truncation that lands on a hyphen still trims it
        let name = format!("{} tail", "b".repeat(MAX_SLUG_LEN - 1));
        let slug = slugify(&name);
        assert!(!slug.ends_with('-'));
        assert_eq!(slug.len(), MAX_SLUG_LEN - 1);
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Potion of Healing (Greater)"), "potion of healing greater");
        assert_eq!(normalize_key("SHADOW"), normalize_key("shadow"));
    }

    proptest! {
        #[test]
        fn prop_slugify_is_deterministic(name in ".{0,80}") {
            prop_assert_eq!(slugify(&name), slugify(&name));
        }

        #[test]
        fn prop_slugify_shape(name in ".{0,120}") {
            let slug = slugify(&name);
            prop_assert!(slug.chars().count() <= MAX_SLUG_LEN);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert!(slug.chars().all(|c| c == '-' || c.is_alphanumeric()));
        }

        #[test]
        fn prop_slugify_is_idempotent(name in "[A-Za-z0-9 '!-]{0,60}") {
            let once = slugify(&name);
            prop_assert_eq!(slugify(&once), once.clone());
        }
    }
}
