//! Configuration constants.
//!
//! This module defines the constants used throughout the verifier, including
//! input limits, per-provider timeouts, retry budgets and production endpoints.

use std::time::Duration;

// URL validation
/// Maximum accepted URL length in characters (after trimming surrounding whitespace).
/// This matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;
/// Minimum accepted URL length in characters.
pub const MIN_URL_LENGTH: usize = 3;
/// Scheme prepended to inputs that carry neither `http://` nor `https://`.
pub const DEFAULT_SCHEME_PREFIX: &str = "https://";

// Network operation timeouts
/// Per-call timeout for the blacklist, reputation and phishing-registry HTTP calls
pub const PROVIDER_HTTP_TIMEOUT_SECS: u64 = 10;
/// TCP connection timeout for the certificate check
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout for the certificate check
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// Overall budget for one registration lookup
pub const WHOIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Port used for the certificate handshake
pub const HTTPS_PORT: u16 = 443;

// Retry strategy
/// Total attempts (initial + retries) for the blacklist and reputation adapters
pub const PROVIDER_MAX_ATTEMPTS: usize = 2;
/// Delay between attempts. The transport timeout is the only backoff.
pub const PROVIDER_RETRY_DELAY_MS: u64 = 0;

// HTTP status codes with special handling
/// Reputation lookups treat this as "not scanned yet"
pub const HTTP_STATUS_NOT_FOUND: u16 = 404;
/// Retriable rate-limit response
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

// Report values
/// Sentinel used for registration fields the provider did not supply
pub const UNKNOWN_FIELD: &str = "unknown";

// Production endpoints
/// Google Safe Browsing API
pub const SAFE_BROWSING_BASE_URL: &str = "https://safebrowsing.googleapis.com";
/// VirusTotal API
pub const VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com";
/// PhishTank check service (plain HTTP only)
pub const PHISHTANK_BASE_URL: &str = "http://checkurl.phishtank.com";

// Credentials
/// Environment variable holding the Safe Browsing API key
pub const SAFE_BROWSING_API_KEY_ENV: &str = "GOOGLE_SAFE_BROWSING_API_KEY";
/// Environment variable holding the VirusTotal API key
pub const VIRUSTOTAL_API_KEY_ENV: &str = "VIRUSTOTAL_API_KEY";

/// Client identifier sent to providers that require one
pub const CLIENT_ID: &str = "phishguard";
/// Client version sent alongside `CLIENT_ID`
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default User-Agent string for provider requests.
pub const DEFAULT_USER_AGENT: &str = concat!("phishguard/", env!("CARGO_PKG_VERSION"));

// HTTP transport
/// Default listen address for `serve`
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
/// Requests allowed per caller within one rate-limit window
pub const RATE_LIMIT_REQUESTS: u32 = 10;
/// Rate-limit window length
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
