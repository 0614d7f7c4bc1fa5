//! URL normalization and validation.
//!
//! Turns raw user input into the canonical absolute URL every provider
//! receives, or rejects it with a [`ValidationError`]. Pure: no I/O, no
//! logging.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DEFAULT_SCHEME_PREFIX, MAX_URL_LENGTH, MIN_URL_LENGTH};
use crate::error_handling::ValidationError;
use crate::utils::compile_regex_unsafe;

/// DNS hostname grammar: dot-separated labels of 1-63 alphanumerics with
/// internal hyphens only.
static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        "DOMAIN_PATTERN",
    )
});

/// A URL that passed validation, in canonical form.
///
/// Immutable once built. The only way to obtain one is
/// [`normalize_and_validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    url: String,
    host: String,
}

impl NormalizedUrl {
    /// Canonical URL string.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Lowercased host, without port or userinfo.
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// Validates `raw` and returns its canonical form.
///
/// Steps, in order:
/// 1. Trim surrounding whitespace; reject empty input.
/// 2. Reject inputs shorter than 3 or longer than 2048 characters.
/// 3. Prepend `https://` unless an `http://` or `https://` prefix is present.
/// 4. Strip trailing `/` (and whitespace left in front of it).
/// 5. Require a host, drop any port, and check it against the DNS label grammar.
///
/// Normalizing an already normalized URL returns the identical string.
///
/// # Examples
///
/// ```
/// use phishguard::normalize_and_validate;
///
/// let url = normalize_and_validate("  example.com/ ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com");
/// assert_eq!(url.host(), "example.com");
/// ```
pub fn normalize_and_validate(raw: &str) -> Result<NormalizedUrl, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let length = trimmed.chars().count();
    if length > MAX_URL_LENGTH {
        return Err(ValidationError::TooLong);
    }
    if length < MIN_URL_LENGTH {
        return Err(ValidationError::TooShort);
    }

    let with_scheme = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    };
    let canonical = strip_trailing(&with_scheme);

    let authority = authority(canonical);
    if authority.is_empty() {
        return Err(ValidationError::MissingDomain);
    }

    let host_and_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = host_and_port.split(':').next().unwrap_or_default();
    if host.is_empty() {
        return Err(ValidationError::MissingDomain);
    }
    if !DOMAIN_PATTERN.is_match(host) {
        return Err(ValidationError::InvalidDomainFormat);
    }

    // Catches what the host grammar does not cover, e.g. a non-numeric port.
    if url::Url::parse(canonical).is_err() {
        return Err(ValidationError::InvalidDomainFormat);
    }

    Ok(NormalizedUrl {
        url: canonical.to_string(),
        host: host.to_ascii_lowercase(),
    })
}

fn has_http_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        input
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Strips trailing `/` and any whitespace it uncovers, until neither is left.
fn strip_trailing(url: &str) -> &str {
    let mut current = url;
    loop {
        let next = current.trim_end().trim_end_matches('/');
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

/// The text between `://` and the first `/`, `?` or `#`; empty without `://`.
fn authority(url: &str) -> &str {
    let Some((_, rest)) = url.split_once("://") else {
        return "";
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}
