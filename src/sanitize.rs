//! Input Sanitization Module
//!
//! Screens raw sector names for injection patterns and normalizes them into
//! the lowercase hyphenated form used for cache keys and search queries.

use once_cell::sync::Lazy;
use regex::RegexSet;

// == Public Constants ==
/// Maximum accepted length of a sanitized sector name
pub const MAX_SECTOR_LENGTH: usize = 50;

/// Patterns that mark input as unsafe to process further
static UNSAFE_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?i)eval\(",
        r"(?i)exec\(",
        r"(?i)import\s+",
        r"(?i)__import__",
    ])
    .expect("static patterns compile")
});

// == Safety Screen ==
/// Returns true when the raw input matches none of the unsafe patterns.
pub fn is_safe_input(raw: &str) -> bool {
    !UNSAFE_PATTERNS.is_match(raw)
}

// == Sector Sanitizer ==
/// Normalizes a raw sector name into its slug form.
///
/// Lowercases, drops everything outside `[a-z0-9 -]`, collapses whitespace
/// runs and turns the remaining spaces into hyphens. Returns `None` when
/// nothing survives the cleaning.
pub fn sanitize_sector(raw: &str) -> Option<String> {
    let filtered: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();

    let slug = filtered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(' ', "-");

    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

// == Length Check ==
/// Validates the sanitized sector length.
///
/// Returns an error message when the name is too long, None when valid.
pub fn validate_sector_length(sector: &str) -> Option<String> {
    if sector.len() > MAX_SECTOR_LENGTH {
        return Some(format!(
            "Sector name exceeds maximum length of {} characters",
            MAX_SECTOR_LENGTH
        ));
    }
    None
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_lowercases_and_hyphenates() {
        assert_eq!(
            sanitize_sector("Real Estate").as_deref(),
            Some("real-estate")
        );
        assert_eq!(sanitize_sector("Technology").as_deref(), Some("technology"));
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(
            sanitize_sector("  renewable    energy  ").as_deref(),
            Some("renewable-energy")
        );
    }

    #[test]
    fn test_sanitize_strips_special_characters() {
        assert_eq!(
            sanitize_sector("pharma & biotech!").as_deref(),
            Some("pharma-biotech")
        );
        assert_eq!(sanitize_sector("agri/food").as_deref(), Some("agrifood"));
    }

    #[test]
    fn test_sanitize_keeps_digits_and_hyphens() {
        assert_eq!(sanitize_sector("web3-infra").as_deref(), Some("web3-infra"));
    }

    #[test]
    fn test_sanitize_rejects_empty_results() {
        assert_eq!(sanitize_sector(""), None);
        assert_eq!(sanitize_sector("   "), None);
        assert_eq!(sanitize_sector("!!!***"), None);
        assert_eq!(sanitize_sector("@@@"), None);
    }

    #[test]
    fn test_is_safe_input_accepts_plain_sectors() {
        assert!(is_safe_input("technology"));
        assert!(is_safe_input("Real Estate"));
        assert!(is_safe_input("pharma-2025"));
    }

    #[test]
    fn test_is_safe_input_flags_injection_patterns() {
        assert!(!is_safe_input("<script>alert(1)</script>"));
        assert!(!is_safe_input("<SCRIPT src=x>"));
        assert!(!is_safe_input("javascript:alert(1)"));
        assert!(!is_safe_input("onload=steal()"));
        assert!(!is_safe_input("eval(payload)"));
        assert!(!is_safe_input("exec(payload)"));
        assert!(!is_safe_input("import os"));
        assert!(!is_safe_input("__import__('os')"));
    }

    #[test]
    fn test_validate_sector_length_boundary() {
        let at_limit = "x".repeat(MAX_SECTOR_LENGTH);
        let over_limit = "x".repeat(MAX_SECTOR_LENGTH + 1);

        assert!(validate_sector_length(&at_limit).is_none());
        assert!(validate_sector_length(&over_limit).is_some());
    }
}
