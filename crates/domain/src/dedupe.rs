//! Title normalization and dedupe key derivation
//!
//! Two superficially different listings of the same product (bracket styles,
//! punctuation noise, casing, whitespace) must map to the same catalog entry.
//! The dedupe key is the SHA-1 of the normalized title; the ingestion
//! pipeline merges listings whose keys match.

use sha1::{Digest, Sha1};

/// Bracket characters replaced by a space before the symbol pass.
///
/// Spelled out explicitly even though the generic symbol rule below would
/// also catch them: this set defines the equivalence classes existing
/// catalog data was keyed under.
const BRACKETS: [char; 8] = ['【', '】', '[', ']', '(', ')', '（', '）'];

/// Symbols kept verbatim during normalization: percentages, pricing,
/// model numbers. Do not extend this set; any change re-keys the catalog.
const KEPT_SYMBOLS: [char; 4] = ['%', '+', '.', '-'];

/// Normalize a raw product title for dedupe comparison.
///
/// Lowercases, replaces brackets and non-whitelisted symbols with spaces,
/// collapses whitespace runs to a single ASCII space, and trims. Total over
/// all inputs; a title with no letters or numbers normalizes to `""`.
pub fn normalize_title(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if BRACKETS.contains(&c) {
                ' '
            } else if c.is_alphanumeric() || c.is_whitespace() || KEPT_SYMBOLS.contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    // split_whitespace collapses runs and drops leading/trailing whitespace
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute the dedupe key for a raw product title.
///
/// Returns the lowercase hex SHA-1 digest (40 chars) of the UTF-8 bytes of
/// the normalized title. Deterministic: titles that normalize identically
/// always share a key.
pub fn dedupe_key(title: &str) -> String {
    let normalized = normalize_title(title);
    let mut hasher = Sha1::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-1 of the empty byte sequence.
    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    fn is_hex_digest(s: &str) -> bool {
        s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn test_dedupe_key_is_deterministic() {
        let title = "Ergonomic Office Chair (Black) 【2024】";
        assert_eq!(dedupe_key(title), dedupe_key(title));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for title in [
            "【新品】Chair (Black)",
            "  spaced   out \t title ",
            "50% off + free.",
            "",
            "!!!###",
        ] {
            let once = normalize_title(title);
            assert_eq!(normalize_title(&once), once);
        }
    }

    #[test]
    fn test_brackets_are_stripped() {
        let normalized = normalize_title("【新品】Chair (Black)");
        for bracket in ['【', '】', '[', ']', '(', ')', '（', '）'] {
            assert!(!normalized.contains(bracket));
        }
        assert_eq!(normalized, "新品 chair black");
    }

    #[test]
    fn test_whitespace_collapses_to_single_spaces() {
        assert_eq!(normalize_title("a   b\t\tc"), "a b c");
    }

    #[test]
    fn test_case_insensitive_keys() {
        assert_eq!(dedupe_key("Office Chair"), dedupe_key("office chair"));
    }

    #[test]
    fn test_symbol_noise_ignored_for_equality() {
        assert_eq!(normalize_title("Chair!!! #1"), "chair 1");
        assert_eq!(normalize_title("Chair 1"), "chair 1");
        assert_eq!(dedupe_key("Chair!!! #1"), dedupe_key("Chair 1"));
    }

    #[test]
    fn test_whitelisted_symbols_preserved() {
        assert_eq!(normalize_title("50% off + free."), "50% off + free.");
    }

    #[test]
    fn test_key_format_is_40_lowercase_hex() {
        assert!(is_hex_digest(&dedupe_key("anything")));
        assert!(is_hex_digest(&dedupe_key("【テスト】 50% OFF!!")));
        assert!(is_hex_digest(&dedupe_key("")));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(dedupe_key(""), EMPTY_SHA1);
        // Symbol-only titles normalize to empty and share the empty key
        assert_eq!(dedupe_key("!!!"), EMPTY_SHA1);
    }

    #[test]
    fn test_fullwidth_brackets_and_cjk_retained() {
        let normalized = normalize_title("（限定）ワイヤレスイヤホン！");
        assert_eq!(normalized, "限定 ワイヤレスイヤホン");
    }

    #[test]
    fn test_unicode_numbers_are_kept() {
        // Digits are Unicode numbers, not symbol noise
        assert_eq!(normalize_title("Model №42"), "model 42");
    }
}
