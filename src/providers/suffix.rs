//! Public suffix check.
//!
//! Pure lookup against the Public Suffix List compiled into the `psl` crate.

use log::debug;

use super::SuffixProvider;
use crate::normalize::NormalizedUrl;

/// Checks hosts against the Public Suffix List.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicSuffixChecker;

impl PublicSuffixChecker {
    /// Creates a checker backed by the compiled-in list.
    pub fn new() -> Self {
        Self
    }
}

impl SuffixProvider for PublicSuffixChecker {
    fn is_valid(&self, url: &NormalizedUrl) -> bool {
        let known = has_known_suffix(url.host());
        if !known {
            debug!("public_suffix: no recognized suffix for {}", url.host());
        }
        known
    }
}

/// True if `host` ends in a suffix listed in the Public Suffix List.
///
/// `psl` falls back to the last label for unlisted TLDs; those are not known.
pub(crate) fn has_known_suffix(host: &str) -> bool {
    psl::suffix(host.as_bytes()).is_some_and(|suffix| suffix.is_known())
}

/// Registrable domain of `host` (e.g. `example.co.uk` for `www.example.co.uk`).
pub(crate) fn registrable_domain(host: &str) -> Option<String> {
    psl::domain(host.as_bytes())
        .filter(|domain| domain.suffix().is_known())
        .and_then(|domain| std::str::from_utf8(domain.as_bytes()).ok().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_and_validate;

    fn check(raw: &str) -> bool {
        let url = normalize_and_validate(raw).unwrap();
        PublicSuffixChecker::new().is_valid(&url)
    }

    #[test]
    fn test_common_suffixes_are_valid() {
        assert!(check("example.com"));
        assert!(check("https://www.example.co.uk/login"));
        assert!(check("example.org:8443"));
    }

    #[test]
    fn test_unknown_suffix_is_invalid() {
        assert!(!check("example.notarealtld"));
    }

    #[test]
    fn test_ip_address_is_invalid() {
        assert!(!check("192.168.1.10"));
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(
            registrable_domain("www.example.co.uk").as_deref(),
            Some("example.co.uk")
        );
        assert_eq!(
            registrable_domain("login.example.com").as_deref(),
            Some("example.com")
        );
        assert_eq!(registrable_domain("com"), None);
        assert_eq!(registrable_domain("example.notarealtld"), None);
    }
}
