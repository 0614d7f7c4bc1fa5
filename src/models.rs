//! Report model.
//!
//! The fixed-shape values produced by the providers and the aggregate report
//! returned for one verification request.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::UNKNOWN_FIELD;

/// Closed-set outcome of one threat-intelligence provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Verdict {
    /// The provider has no record of the URL being harmful.
    Safe,
    /// The provider flags the URL.
    Malicious,
    /// The provider is not configured (credential missing).
    Unavailable,
    /// The call failed, was rate-limited, or returned an unexpected shape.
    Error,
}

/// Result of the TLS certificate check.
///
/// `valid == false` always comes with `days_remaining == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateAssessment {
    /// Whether the peer certificate is currently within its validity window
    pub valid: bool,
    /// Whole days until the certificate expires
    pub days_remaining: u32,
}

impl CertificateAssessment {
    /// A valid certificate with `days_remaining` whole days left.
    ///
    /// Zero days left is not a valid certificate and yields [`Self::invalid`].
    pub fn valid(days_remaining: u32) -> Self {
        if days_remaining == 0 {
            return Self::invalid();
        }
        Self {
            valid: true,
            days_remaining,
        }
    }

    /// The assessment reported for every kind of certificate failure.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            days_remaining: 0,
        }
    }
}

/// Public suffix validity of the URL's host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SuffixStatus {
    /// The host ends in a recognized public suffix.
    Valid,
    /// The suffix is unknown or could not be determined.
    Invalid,
}

impl From<bool> for SuffixStatus {
    fn from(valid: bool) -> Self {
        if valid {
            SuffixStatus::Valid
        } else {
            SuffixStatus::Invalid
        }
    }
}

/// Domain registration data from a WHOIS lookup.
///
/// Every field is always populated; values the registry did not supply hold
/// the `"unknown"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Registered domain name
    pub domain_name: String,
    /// Registrar name
    pub registrar: String,
    /// Creation date
    pub creation_date: String,
    /// Expiration date
    pub expiration_date: String,
    /// Name servers, comma separated
    pub name_servers: String,
}

impl RegistrationRecord {
    /// Builds a record from optional fields.
    ///
    /// Returns `None` when no field is populated; otherwise missing fields are
    /// defaulted to `"unknown"`.
    pub fn from_fields(
        domain_name: Option<String>,
        registrar: Option<String>,
        creation_date: Option<String>,
        expiration_date: Option<String>,
        name_servers: Option<String>,
    ) -> Option<Self> {
        let fields = [
            domain_name,
            registrar,
            creation_date,
            expiration_date,
            name_servers,
        ]
        .map(|field| field.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()));

        if fields.iter().all(Option::is_none) {
            return None;
        }

        let [domain_name, registrar, creation_date, expiration_date, name_servers] =
            fields.map(|field| field.unwrap_or_else(|| UNKNOWN_FIELD.to_string()));

        Some(Self {
            domain_name,
            registrar,
            creation_date,
            expiration_date,
            name_servers,
        })
    }
}

/// Aggregate result of one verification request.
///
/// Every field has a value for every request that passed validation, even when
/// all providers failed. `registration` is the only optional field and
/// serializes as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Canonical URL every provider received
    pub url: String,
    /// Blacklist (Google Safe Browsing) verdict
    pub blacklist: Verdict,
    /// Reputation aggregator (VirusTotal) verdict
    pub reputation: Verdict,
    /// Phishing registry (PhishTank) verdict
    pub phishing: Verdict,
    /// TLS certificate validity
    pub certificate: CertificateAssessment,
    /// Public suffix validity
    pub domain_suffix: SuffixStatus,
    /// WHOIS registration data, absent when the lookup failed
    pub registration: Option<RegistrationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_verdict_serializes_as_name() {
        for verdict in Verdict::iter() {
            let json = serde_json::to_string(&verdict).unwrap();
            assert_eq!(json, format!("\"{}\"", verdict));
        }
    }

    #[test]
    fn test_certificate_zero_days_is_invalid() {
        assert_eq!(CertificateAssessment::valid(0), CertificateAssessment::invalid());
        let assessment = CertificateAssessment::valid(30);
        assert!(assessment.valid);
        assert_eq!(assessment.days_remaining, 30);
    }

    #[test]
    fn test_suffix_status_from_bool() {
        assert_eq!(SuffixStatus::from(true), SuffixStatus::Valid);
        assert_eq!(SuffixStatus::from(false), SuffixStatus::Invalid);
    }

    #[test]
    fn test_registration_record_defaults_missing_fields() {
        let record = RegistrationRecord::from_fields(
            Some("example.com".to_string()),
            Some("Example Registrar, Inc.".to_string()),
            None,
            Some("   ".to_string()),
            None,
        )
        .expect("record with populated fields");

        assert_eq!(record.domain_name, "example.com");
        assert_eq!(record.registrar, "Example Registrar, Inc.");
        assert_eq!(record.creation_date, "unknown");
        assert_eq!(record.expiration_date, "unknown");
        assert_eq!(record.name_servers, "unknown");
    }

    #[test]
    fn test_registration_record_absent_when_empty() {
        assert!(RegistrationRecord::from_fields(None, None, None, None, None).is_none());
        assert!(RegistrationRecord::from_fields(
            Some(String::new()),
            None,
            Some(" ".to_string()),
            None,
            None
        )
        .is_none());
    }

    #[test]
    fn test_report_serializes_missing_registration_as_null() {
        let report = VerificationReport {
            url: "https://example.com".to_string(),
            blacklist: Verdict::Safe,
            reputation: Verdict::Unavailable,
            phishing: Verdict::Error,
            certificate: CertificateAssessment::invalid(),
            domain_suffix: SuffixStatus::Valid,
            registration: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["blacklist"], "Safe");
        assert_eq!(value["reputation"], "Unavailable");
        assert_eq!(value["phishing"], "Error");
        assert_eq!(value["certificate"]["valid"], false);
        assert_eq!(value["certificate"]["days_remaining"], 0);
        assert_eq!(value["domain_suffix"], "Valid");
        assert!(value.as_object().unwrap().contains_key("registration"));
        assert!(value["registration"].is_null());
    }
}
