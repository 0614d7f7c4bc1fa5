//! Configuration types.
//!
//! This module defines the structs used to configure the verifier and its
//! providers. None of them depend on the CLI; the binary maps its flags onto
//! `Config`.

use std::net::SocketAddr;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_USER_AGENT, PHISHTANK_BASE_URL, PROVIDER_HTTP_TIMEOUT_SECS,
    RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW, SAFE_BROWSING_API_KEY_ENV, SAFE_BROWSING_BASE_URL,
    VIRUSTOTAL_API_KEY_ENV, VIRUSTOTAL_BASE_URL,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// API credentials for the providers that need one.
///
/// A missing credential is not an error: the affected provider reports
/// `Unavailable` and every other provider still runs.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    /// Google Safe Browsing API key
    pub safe_browsing_api_key: Option<String>,
    /// VirusTotal API key
    pub virustotal_api_key: Option<String>,
}

impl ProviderCredentials {
    /// Reads credentials from `GOOGLE_SAFE_BROWSING_API_KEY` and `VIRUSTOTAL_API_KEY`.
    ///
    /// Unset and blank variables are both treated as absent.
    pub fn from_env() -> Self {
        Self {
            safe_browsing_api_key: non_blank_env(SAFE_BROWSING_API_KEY_ENV),
            virustotal_api_key: non_blank_env(VIRUSTOTAL_API_KEY_ENV),
        }
    }
}

// Keys never end up in logs or Debug output.
impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("safe_browsing_api_key", &self.safe_browsing_api_key.is_some())
            .field("virustotal_api_key", &self.virustotal_api_key.is_some())
            .finish()
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Base URLs of the external services.
///
/// Defaults point at production. Tests override them with local mock servers.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    /// Google Safe Browsing API base URL
    pub safe_browsing: String,
    /// VirusTotal API base URL
    pub virustotal: String,
    /// PhishTank check service base URL
    pub phishtank: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            safe_browsing: SAFE_BROWSING_BASE_URL.to_string(),
            virustotal: VIRUSTOTAL_BASE_URL.to_string(),
            phishtank: PHISHTANK_BASE_URL.to_string(),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use phishguard::{Config, ProviderCredentials};
///
/// let config = Config {
///     credentials: ProviderCredentials::from_env(),
///     timeout_seconds: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Per-call timeout in seconds for the HTTP-based providers
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Provider API credentials
    pub credentials: ProviderCredentials,

    /// Provider base URLs
    pub endpoints: ProviderEndpoints,

    /// Requests allowed per caller per rate-limit window (HTTP transport only)
    pub rate_limit_requests: u32,

    /// Rate-limit window length (HTTP transport only)
    pub rate_limit_window: Duration,

    /// Address the HTTP transport binds to
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: PROVIDER_HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credentials: ProviderCredentials::default(),
            endpoints: ProviderEndpoints::default(),
            rate_limit_requests: RATE_LIMIT_REQUESTS,
            rate_limit_window: RATE_LIMIT_WINDOW,
            bind_addr: Self::default_bind_addr(),
        }
    }
}

impl Config {
    /// Parses `DEFAULT_BIND_ADDR`, falling back to 127.0.0.1:8000.
    pub fn default_bind_addr() -> SocketAddr {
        DEFAULT_BIND_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8000)))
    }
}
