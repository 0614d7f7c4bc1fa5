// Shared test helpers: stub providers and a verifier built from them.
//
// Each test binary includes this with `mod helpers;`.

#![allow(dead_code)] // Not every test file uses every helper

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use phishguard::providers::{
    CertificateProvider, RegistrationProvider, SuffixProvider, ThreatProvider,
};
use phishguard::{
    CertificateAssessment, NormalizedUrl, ProviderError, Providers, RegistrationRecord, Verdict,
    Verifier,
};

/// Counts adapter invocations across all stubs of one verifier.
#[derive(Default)]
pub struct CallCounter(AtomicUsize);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a stub threat provider answers.
#[derive(Clone, Copy)]
pub enum Answer {
    Verdict(Verdict),
    MissingCredential,
    Failure,
    Panic,
}

struct FixedThreat {
    name: &'static str,
    answer: Answer,
    calls: Arc<CallCounter>,
}

#[async_trait]
impl ThreatProvider for FixedThreat {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self, _url: &NormalizedUrl) -> Result<Verdict, ProviderError> {
        self.calls.hit();
        match self.answer {
            Answer::Verdict(verdict) => Ok(verdict),
            Answer::MissingCredential => {
                Err(ProviderError::MissingCredential { provider: self.name })
            }
            Answer::Failure => Err(ProviderError::UnexpectedStatus {
                provider: self.name,
                status: 503,
            }),
            Answer::Panic => panic!("{} stub panicked", self.name),
        }
    }
}

struct FixedCertificate {
    assessment: CertificateAssessment,
    calls: Arc<CallCounter>,
}

#[async_trait]
impl CertificateProvider for FixedCertificate {
    async fn assess(&self, _url: &NormalizedUrl) -> CertificateAssessment {
        self.calls.hit();
        self.assessment
    }
}

struct FixedSuffix {
    valid: bool,
    calls: Arc<CallCounter>,
}

impl SuffixProvider for FixedSuffix {
    fn is_valid(&self, _url: &NormalizedUrl) -> bool {
        self.calls.hit();
        self.valid
    }
}

struct FixedRegistration {
    record: Option<RegistrationRecord>,
    calls: Arc<CallCounter>,
}

#[async_trait]
impl RegistrationProvider for FixedRegistration {
    async fn lookup(&self, _url: &NormalizedUrl) -> Option<RegistrationRecord> {
        self.calls.hit();
        self.record.clone()
    }
}

/// Registration data every benign stub returns.
pub fn example_record() -> RegistrationRecord {
    RegistrationRecord::from_fields(
        Some("example.com".to_string()),
        Some("Example Registrar, Inc.".to_string()),
        Some("1995-08-14 04:00:00".to_string()),
        Some("2030-08-13 04:00:00".to_string()),
        Some("a.iana-servers.net, b.iana-servers.net".to_string()),
    )
    .expect("record has populated fields")
}

/// Stub configuration; `Default` is the all-benign scenario.
pub struct Scenario {
    pub blacklist: Answer,
    pub reputation: Answer,
    pub phishing: Answer,
    pub certificate: CertificateAssessment,
    pub suffix_valid: bool,
    pub registration: Option<RegistrationRecord>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            blacklist: Answer::Verdict(Verdict::Safe),
            reputation: Answer::Verdict(Verdict::Safe),
            phishing: Answer::Verdict(Verdict::Safe),
            certificate: CertificateAssessment::valid(120),
            suffix_valid: true,
            registration: Some(example_record()),
        }
    }
}

impl Scenario {
    /// Builds a verifier whose adapters all report to the returned counter.
    pub fn verifier(self) -> (Verifier, Arc<CallCounter>) {
        let calls = Arc::new(CallCounter::default());
        let threat = |name: &'static str, answer: Answer| -> Arc<dyn ThreatProvider> {
            Arc::new(FixedThreat {
                name,
                answer,
                calls: Arc::clone(&calls),
            })
        };

        let providers = Providers {
            blacklist: threat("safe_browsing", self.blacklist),
            reputation: threat("virustotal", self.reputation),
            phishing: threat("phishtank", self.phishing),
            certificate: Arc::new(FixedCertificate {
                assessment: self.certificate,
                calls: Arc::clone(&calls),
            }),
            suffix: Arc::new(FixedSuffix {
                valid: self.suffix_valid,
                calls: Arc::clone(&calls),
            }),
            registration: Arc::new(FixedRegistration {
                record: self.registration,
                calls: Arc::clone(&calls),
            }),
        };

        (Verifier::new(providers), calls)
    }
}
