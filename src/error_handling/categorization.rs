//! Error categorization.
//!
//! Maps provider failures onto report verdicts and decides which failures are
//! worth another attempt.

use super::types::ProviderError;
use crate::config::HTTP_STATUS_TOO_MANY_REQUESTS;
use crate::models::Verdict;

impl ProviderError {
    /// Verdict reported for this failure.
    ///
    /// A missing credential is an operator problem and is reported as
    /// `Unavailable`; everything else is `Error`.
    pub fn verdict(&self) -> Verdict {
        match self {
            ProviderError::MissingCredential { .. } => Verdict::Unavailable,
            _ => Verdict::Error,
        }
    }

    /// Returns true if the failure is transient and the call may be repeated.
    ///
    /// # Retriable
    ///
    /// - Timeouts
    /// - Connection and request failures reported by `reqwest`
    /// - 429 Too Many Requests and 5xx status codes
    ///
    /// # Non-Retriable
    ///
    /// - Missing credentials
    /// - Other 4xx status codes
    /// - Bodies that cannot be interpreted
    /// - Panics
    pub fn is_retriable(&self) -> bool {
        match self {
            ProviderError::Timeout { .. } => true,
            ProviderError::Http(e) => {
                if let Some(status) = e.status() {
                    return is_retriable_status(status.as_u16());
                }
                e.is_timeout() || e.is_connect() || e.is_request()
            }
            ProviderError::UnexpectedStatus { status, .. } => is_retriable_status(*status),
            ProviderError::MissingCredential { .. }
            | ProviderError::UnexpectedResponse { .. }
            | ProviderError::Panicked { .. } => false,
        }
    }
}

fn is_retriable_status(status: u16) -> bool {
    status == HTTP_STATUS_TOO_MANY_REQUESTS || (500..600).contains(&status)
}
