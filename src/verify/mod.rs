//! Verification orchestrator.
//!
//! Validates the raw URL, fans it out to all six providers concurrently,
//! isolates each provider's failures (including panics) and merges the six
//! outcomes into one [`VerificationReport`].
//!
//! The only error that leaves [`Verifier::verify`] is a [`ValidationError`];
//! every provider failure is absorbed into the report.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::{InitializationError, ProviderError, ValidationError, VerifyError};
use crate::initialization::init_client;
use crate::models::{
    CertificateAssessment, RegistrationRecord, SuffixStatus, Verdict, VerificationReport,
};
use crate::normalize::{normalize_and_validate, NormalizedUrl};
use crate::providers::{
    CertificateProvider, PhishTankClient, PublicSuffixChecker, RegistrationProvider,
    SafeBrowsingClient, SuffixProvider, ThreatProvider, TlsCertificateChecker, VirusTotalClient,
    WhoisLookup,
};

const CERTIFICATE: &str = "tls";
const SUFFIX: &str = "public_suffix";
const REGISTRATION: &str = "whois";

/// The six adapters a [`Verifier`] dispatches to.
///
/// Each slot is a trait object so tests and embedders can substitute their
/// own implementations.
#[derive(Clone)]
pub struct Providers {
    /// Blacklist check
    pub blacklist: Arc<dyn ThreatProvider>,
    /// Reputation aggregator
    pub reputation: Arc<dyn ThreatProvider>,
    /// Phishing registry
    pub phishing: Arc<dyn ThreatProvider>,
    /// Certificate check
    pub certificate: Arc<dyn CertificateProvider>,
    /// Public suffix check
    pub suffix: Arc<dyn SuffixProvider>,
    /// Registration lookup
    pub registration: Arc<dyn RegistrationProvider>,
}

impl Providers {
    /// Builds the production adapters from `config`.
    ///
    /// Missing credentials are not an error here; the affected providers
    /// report `Unavailable` at check time.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        let endpoints = &config.endpoints;
        let credentials = &config.credentials;

        Ok(Self {
            blacklist: Arc::new(SafeBrowsingClient::new(
                Arc::clone(&client),
                credentials.safe_browsing_api_key.clone(),
                endpoints.safe_browsing.clone(),
            )),
            reputation: Arc::new(VirusTotalClient::new(
                Arc::clone(&client),
                credentials.virustotal_api_key.clone(),
                endpoints.virustotal.clone(),
            )),
            phishing: Arc::new(PhishTankClient::new(
                client,
                endpoints.phishtank.clone(),
                config.user_agent.clone(),
            )),
            certificate: Arc::new(TlsCertificateChecker::new()),
            suffix: Arc::new(PublicSuffixChecker::new()),
            registration: Arc::new(WhoisLookup::new()),
        })
    }
}

/// Raw outcome of each adapter for one request, before merging.
///
/// `Err` on the certificate, suffix and registration slots only ever carries
/// a caught panic; those adapters absorb their own failures.
#[derive(Debug)]
pub(crate) struct ProviderOutcomes {
    pub blacklist: Result<Verdict, ProviderError>,
    pub reputation: Result<Verdict, ProviderError>,
    pub phishing: Result<Verdict, ProviderError>,
    pub certificate: Result<CertificateAssessment, ProviderError>,
    pub suffix: Result<bool, ProviderError>,
    pub registration: Result<Option<RegistrationRecord>, ProviderError>,
}

/// Merges adapter outcomes into the report.
///
/// Pure: the same outcomes always produce the same report.
pub(crate) fn merge(url: &NormalizedUrl, outcomes: ProviderOutcomes) -> VerificationReport {
    let verdict = |outcome: Result<Verdict, ProviderError>| outcome.unwrap_or_else(|e| e.verdict());

    VerificationReport {
        url: url.as_str().to_string(),
        blacklist: verdict(outcomes.blacklist),
        reputation: verdict(outcomes.reputation),
        phishing: verdict(outcomes.phishing),
        certificate: outcomes
            .certificate
            .unwrap_or_else(|_| CertificateAssessment::invalid()),
        domain_suffix: SuffixStatus::from(outcomes.suffix.unwrap_or(false)),
        registration: outcomes.registration.ok().flatten(),
    }
}

/// Runs `future`, turning a panic inside it into `ProviderError::Panicked`.
async fn isolate<T>(
    provider: &'static str,
    future: impl Future<Output = T>,
) -> Result<T, ProviderError> {
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|payload| ProviderError::Panicked {
            provider,
            detail: panic_message(&*payload),
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

async fn check_threat(
    provider: &dyn ThreatProvider,
    url: &NormalizedUrl,
) -> Result<Verdict, ProviderError> {
    isolate(provider.name(), provider.check(url))
        .await
        .and_then(|outcome| outcome)
}

fn log_rejection(raw: &str, error: &ValidationError) {
    let shown: String = raw.trim().chars().take(100).collect();
    warn!("Rejected URL {shown:?}: {error} ({})", error.code());
}

fn log_failure<T>(provider: &str, outcome: &Result<T, ProviderError>) {
    match outcome {
        Err(e @ ProviderError::MissingCredential { .. }) => info!("{provider}: {e}"),
        Err(e) => warn!("{provider}: {e}"),
        Ok(_) => {}
    }
}

/// Verification orchestrator.
///
/// Stateless across requests; share one instance behind an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use phishguard::{Config, ProviderCredentials, Verifier};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     credentials: ProviderCredentials::from_env(),
///     ..Default::default()
/// };
/// let verifier = Verifier::from_config(&config)?;
/// let report = verifier.verify("example.com").await?;
/// println!("{}", serde_json::to_string_pretty(&report)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Verifier {
    providers: Providers,
}

impl Verifier {
    /// Creates a verifier over `providers`.
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    /// Builds a verifier with the production adapters.
    ///
    /// # Errors
    ///
    /// See [`Providers::from_config`].
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::new(Providers::from_config(config)?))
    }

    /// Verifies `raw`.
    ///
    /// Rejected input returns the validation error without invoking any
    /// provider. Accepted input always produces a complete report, however
    /// many providers fail.
    pub async fn verify(&self, raw: &str) -> Result<VerificationReport, ValidationError> {
        let url = normalize_and_validate(raw).inspect_err(|e| log_rejection(raw, e))?;

        info!("Verifying {url}");
        let report = merge(&url, self.dispatch(&url).await);
        info!("Verification of {url} completed");
        Ok(report)
    }

    /// Like [`Verifier::verify`], but abandons in-flight provider calls when
    /// `cancel` fires. A cancelled request never yields a report.
    pub async fn verify_until_cancelled(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<VerificationReport, VerifyError> {
        let url = normalize_and_validate(raw).inspect_err(|e| log_rejection(raw, e))?;

        info!("Verifying {url}");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Verification of {url} cancelled");
                Err(VerifyError::Cancelled)
            }
            outcomes = self.dispatch(&url) => {
                info!("Verification of {url} completed");
                Ok(merge(&url, outcomes))
            }
        }
    }

    /// Runs all six adapters concurrently and waits for every one to settle.
    async fn dispatch(&self, url: &NormalizedUrl) -> ProviderOutcomes {
        let providers = &self.providers;

        let (blacklist, reputation, phishing, certificate, suffix, registration) = tokio::join!(
            check_threat(providers.blacklist.as_ref(), url),
            check_threat(providers.reputation.as_ref(), url),
            check_threat(providers.phishing.as_ref(), url),
            isolate(CERTIFICATE, providers.certificate.assess(url)),
            isolate(SUFFIX, async { providers.suffix.is_valid(url) }),
            isolate(REGISTRATION, providers.registration.lookup(url)),
        );

        log_failure(providers.blacklist.name(), &blacklist);
        log_failure(providers.reputation.name(), &reputation);
        log_failure(providers.phishing.name(), &phishing);
        log_failure(CERTIFICATE, &certificate);
        log_failure(SUFFIX, &suffix);
        log_failure(REGISTRATION, &registration);

        ProviderOutcomes {
            blacklist,
            reputation,
            phishing,
            certificate,
            suffix,
            registration,
        }
    }
}
