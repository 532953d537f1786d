//! # Canonical Hostname Handling
//!
//! Every hostname that enters the pipeline passes through this module first.
//! The canonical form (lowercase, trimmed, trailing dot stripped) is the join
//! key used by the accumulator, the attribution map, and the final report.
//!
//! Both functions are pure and total: invalid input yields `false` or an
//! empty string, never an error.

/// Reduces a raw hostname string to its canonical form.
///
/// Two raw strings refer to the same asset iff their canonical forms are
/// equal. Exactly one trailing dot is stripped, so `"example.com."` and
/// `"example.com"` collapse while a (bogus) `"example.com.."` does not
/// collapse all the way.
pub fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim().to_lowercase();
    trimmed
        .strip_suffix('.')
        .map(str::to_string)
        .unwrap_or(trimmed)
}

/// Decides whether a raw string is worth keeping as a hostname candidate.
///
/// Rejects empty strings, wildcard entries (`*.example.com`), strings with
/// an `@` (email addresses leak out of certificate fields), internal
/// whitespace, and anything without a single dot.
pub fn is_valid_candidate(raw: &str) -> bool {
    let candidate = raw.trim();

    !candidate.is_empty()
        && !candidate.starts_with('*')
        && !candidate.contains('@')
        && !candidate.contains(char::is_whitespace)
        && candidate.contains('.')
}

/// Normalizes an organization name into a filesystem- and index-friendly
/// key: lowercased, spaces replaced with underscores.
pub fn normalize_org_key(org: &str) -> String {
    org.trim().to_lowercase().replace(' ', "_")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_case_whitespace_and_trailing_dot() {
        assert_eq!(canonicalize("Example.COM. "), "example.com");
        assert_eq!(canonicalize("example.com"), "example.com");
        assert_eq!(canonicalize("  WWW.Example.Org"), "www.example.org");
    }

    #[test]
    fn canonicalize_strips_a_single_trailing_dot() {
        assert_eq!(canonicalize("a.example.com."), "a.example.com");
        assert_eq!(canonicalize("a.example.com.."), "a.example.com.");
    }

    #[test]
    fn rejects_invalid_candidates() {
        assert!(!is_valid_candidate(""));
        assert!(!is_valid_candidate("*.example.com"));
        assert!(!is_valid_candidate("a b.com"));
        assert!(!is_valid_candidate("user@example.com"));
        assert!(!is_valid_candidate("localhost"));
    }

    #[test]
    fn accepts_ordinary_hostnames() {
        assert!(is_valid_candidate("example.com"));
        assert!(is_valid_candidate("deep.sub.example.co.uk"));
    }

    #[test]
    fn org_key_is_directory_safe() {
        assert_eq!(normalize_org_key("Acme Corp"), "acme_corp");
        assert_eq!(normalize_org_key("example.com"), "example.com");
    }
}
