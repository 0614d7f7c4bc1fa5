//! `Providers::from_config` wired to mock provider endpoints.
//!
//! The HTTP providers talk to a `wiremock` server. The URL's host is a
//! loopback address and the registration lookup gets no time budget, so the
//! certificate, suffix and registration checks all take their failure paths
//! without leaving the machine.

use std::sync::Arc;
use std::time::Duration;

use phishguard::initialization::init_crypto_provider;
use phishguard::providers::WhoisLookup;
use phishguard::{
    CertificateAssessment, Config, ProviderCredentials, ProviderEndpoints, Providers,
    SuffixStatus, Verdict, Verifier,
};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, credentials: ProviderCredentials) -> Config {
    Config {
        timeout_seconds: 2,
        credentials,
        endpoints: ProviderEndpoints {
            safe_browsing: server.uri(),
            virustotal: server.uri(),
            phishtank: server.uri(),
        },
        ..Default::default()
    }
}

fn verifier_for(config: &Config) -> Verifier {
    let mut providers = Providers::from_config(config).unwrap();
    providers.registration = Arc::new(WhoisLookup::new().with_timeout(Duration::ZERO));
    Verifier::new(providers)
}

#[tokio::test]
async fn test_production_adapters_against_mock_endpoints() {
    init_crypto_provider();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/threatMatches:find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{ "threatType": "MALWARE" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v3/urls/[A-Za-z0-9_-]+$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/checkurl/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": { "in_database": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        ProviderCredentials {
            safe_browsing_api_key: Some("gsb-key".to_string()),
            virustotal_api_key: Some("vt-key".to_string()),
        },
    );
    let verifier = verifier_for(&config);

    let report = verifier.verify("http://127.0.0.1/login").await.unwrap();

    assert_eq!(report.url, "http://127.0.0.1/login");
    assert_eq!(report.blacklist, Verdict::Malicious);
    assert_eq!(report.reputation, Verdict::Safe);
    assert_eq!(report.phishing, Verdict::Safe);
    assert_eq!(report.certificate, CertificateAssessment::invalid());
    assert_eq!(report.domain_suffix, SuffixStatus::Invalid);
    assert!(report.registration.is_none());
}

#[tokio::test]
async fn test_missing_keys_skip_keyed_providers() {
    init_crypto_provider();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkurl/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": { "in_database": true, "valid": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, ProviderCredentials::default());
    let verifier = verifier_for(&config);

    let report = verifier.verify("127.0.0.1").await.unwrap();

    assert_eq!(report.blacklist, Verdict::Unavailable);
    assert_eq!(report.reputation, Verdict::Unavailable);
    assert_eq!(report.phishing, Verdict::Malicious);
    // Only the PhishTank mock may have been hit.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
