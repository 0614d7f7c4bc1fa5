//! Error type definitions.
//!
//! This module defines the error taxonomy used throughout the verifier:
//! input errors (caller's fault), provider errors (configuration or transient),
//! orchestration errors and initialization errors.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Rejection of a raw URL by the normalizer/validator.
///
/// Each variant carries a stable code (see [`ValidationError::code`]) that the
/// transport layer can hand to clients unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    /// Input was empty or whitespace only.
    #[error("URL cannot be empty")]
    EmptyUrl,

    /// Input is shorter than the minimum length.
    #[error("URL is too short")]
    TooShort,

    /// Input is longer than the maximum length.
    #[error("URL is too long")]
    TooLong,

    /// No host component could be found.
    #[error("Invalid URL format: missing domain")]
    MissingDomain,

    /// The host does not follow DNS label rules.
    #[error("Invalid domain format")]
    InvalidDomainFormat,
}

impl ValidationError {
    /// Stable machine-readable code for this rejection.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyUrl => "EmptyURL",
            ValidationError::TooShort => "TooShort",
            ValidationError::TooLong => "TooLong",
            ValidationError::MissingDomain => "MissingDomain",
            ValidationError::InvalidDomainFormat => "InvalidDomainFormat",
        }
    }
}

/// Failure raised by a provider adapter.
///
/// Adapters return these instead of swallowing failures; the orchestrator turns
/// them into report values (see `categorization`).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider needs a credential that is not configured.
    #[error("{provider} credential is not configured")]
    MissingCredential {
        /// Provider name
        provider: &'static str,
    },

    /// The call did not complete within its deadline.
    #[error("{provider} timed out: {detail}")]
    Timeout {
        /// Provider name
        provider: &'static str,
        /// What timed out
        detail: String,
    },

    /// Transport-level failure reported by the HTTP client.
    #[error("HTTP request failed: {0}")]
    Http(#[from] ReqwestError),

    /// The provider answered with a status code the adapter does not accept.
    #[error("{provider} returned unexpected status {status}")]
    UnexpectedStatus {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// The provider answered with a body the adapter cannot interpret.
    #[error("{provider} returned an unexpected response: {detail}")]
    UnexpectedResponse {
        /// Provider name
        provider: &'static str,
        /// What was wrong with the body
        detail: String,
    },

    /// The adapter panicked; caught at the orchestrator boundary.
    #[error("{provider} adapter panicked: {detail}")]
    Panicked {
        /// Provider name
        provider: &'static str,
        /// Panic payload, when it was a string
        detail: String,
    },
}

/// Failure of a whole verification request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The input URL was rejected; no provider ran.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request was cancelled before the report was complete.
    #[error("verification cancelled")]
    Cancelled,
}
