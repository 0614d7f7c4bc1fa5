//! Provider adapters.
//!
//! Each adapter wraps one external signal and maps its private response shape
//! onto a small closed result type:
//! - [`SafeBrowsingClient`]: blacklist check (Google Safe Browsing)
//! - [`VirusTotalClient`]: reputation aggregator (VirusTotal)
//! - [`PhishTankClient`]: phishing registry (PhishTank)
//! - [`TlsCertificateChecker`]: certificate validity via a TLS handshake
//! - [`PublicSuffixChecker`]: public suffix list lookup (no network)
//! - [`WhoisLookup`]: domain registration lookup (WHOIS/RDAP)
//!
//! The traits below are the seams the orchestrator depends on, so every
//! adapter can be swapped for a stub in tests.

mod blacklist;
mod phishing;
mod reputation;
mod suffix;
mod tls;
mod whois;

use async_trait::async_trait;

use crate::error_handling::ProviderError;
use crate::models::{CertificateAssessment, RegistrationRecord, Verdict};
use crate::normalize::NormalizedUrl;

pub use blacklist::SafeBrowsingClient;
pub use phishing::PhishTankClient;
pub use reputation::VirusTotalClient;
pub use suffix::PublicSuffixChecker;
pub use tls::TlsCertificateChecker;
pub use whois::WhoisLookup;

/// A threat-intelligence provider producing a [`Verdict`].
///
/// Implementations return failures instead of absorbing them; the
/// orchestrator maps them onto the report.
#[async_trait]
pub trait ThreatProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Looks up `url`.
    async fn check(&self, url: &NormalizedUrl) -> Result<Verdict, ProviderError>;
}

/// Assesses the TLS certificate served for a URL's host.
///
/// Never fails: every kind of failure is an invalid assessment.
#[async_trait]
pub trait CertificateProvider: Send + Sync {
    /// Assesses the certificate served for `url`'s host.
    async fn assess(&self, url: &NormalizedUrl) -> CertificateAssessment;
}

/// Classifies a URL's host against the public suffix list.
pub trait SuffixProvider: Send + Sync {
    /// True if the host ends in a recognized public suffix.
    fn is_valid(&self, url: &NormalizedUrl) -> bool;
}

/// Looks up domain registration data.
///
/// `None` means no record: the lookup failed or nothing useful came back.
#[async_trait]
pub trait RegistrationProvider: Send + Sync {
    /// Looks up registration data for `url`'s domain.
    async fn lookup(&self, url: &NormalizedUrl) -> Option<RegistrationRecord>;
}

/// Maps a `reqwest` failure onto [`ProviderError`], pulling timeouts out into
/// their own variant.
pub(crate) fn transport_error(provider: &'static str, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout {
            provider,
            detail: error.to_string(),
        }
    } else {
        ProviderError::Http(error)
    }
}
