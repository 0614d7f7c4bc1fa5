//! Reputation check against the VirusTotal v3 URL report API.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use log::{debug, info, warn};
use serde::Deserialize;

use super::{transport_error, ThreatProvider};
use crate::config::HTTP_STATUS_NOT_FOUND;
use crate::error_handling::ProviderError;
use crate::models::Verdict;
use crate::normalize::NormalizedUrl;
use crate::utils::retry_provider_call;

const PROVIDER: &str = "virustotal";

#[derive(Debug, Deserialize)]
struct UrlReport {
    data: UrlReportData,
}

#[derive(Debug, Deserialize)]
struct UrlReportData {
    attributes: UrlAttributes,
}

#[derive(Debug, Deserialize)]
struct UrlAttributes {
    last_analysis_stats: AnalysisStats,
}

#[derive(Debug, Deserialize)]
struct AnalysisStats {
    #[serde(default)]
    malicious: u64,
}

/// VirusTotal URL identifier: the URL bytes, URL-safe base64, no padding.
pub(crate) fn url_identifier(url: &str) -> String {
    URL_SAFE_NO_PAD.encode(url.as_bytes())
}

/// VirusTotal client.
///
/// A URL VirusTotal has never scanned (404) is reported as `Safe`.
pub struct VirusTotalClient {
    client: Arc<reqwest::Client>,
    api_key: Option<String>,
    base_url: String,
}

impl VirusTotalClient {
    /// Creates a client for `base_url`; `api_key` of `None` disables the provider.
    pub fn new(
        client: Arc<reqwest::Client>,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }

    async fn fetch_report(&self, api_key: &str, url: &str) -> Result<Verdict, ProviderError> {
        let response = self
            .client
            .get(format!(
                "{}/api/v3/urls/{}",
                self.base_url,
                url_identifier(url)
            ))
            .header("x-apikey", api_key)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if status.as_u16() == HTTP_STATUS_NOT_FOUND {
            debug!("{PROVIDER}: {url} has not been scanned yet");
            return Ok(Verdict::Safe);
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let report: UrlReport =
            response
                .json()
                .await
                .map_err(|e| ProviderError::UnexpectedResponse {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;

        let malicious = report.data.attributes.last_analysis_stats.malicious;
        if malicious > 0 {
            warn!("{PROVIDER}: {malicious} engine(s) flag {url}");
            Ok(Verdict::Malicious)
        } else {
            Ok(Verdict::Safe)
        }
    }
}

#[async_trait]
impl ThreatProvider for VirusTotalClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn check(&self, url: &NormalizedUrl) -> Result<Verdict, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!("{PROVIDER}: API key not configured, skipping");
            return Err(ProviderError::MissingCredential { provider: PROVIDER });
        };

        retry_provider_call(PROVIDER, || self.fetch_report(api_key, url.as_str())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_and_validate;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> VirusTotalClient {
        VirusTotalClient::new(
            Arc::new(reqwest::Client::new()),
            api_key.map(str::to_string),
            server.uri(),
        )
    }

    fn report(malicious: u64) -> serde_json::Value {
        json!({
            "data": {
                "id": "abc",
                "type": "url",
                "attributes": {
                    "last_analysis_stats": {
                        "harmless": 70,
                        "malicious": malicious,
                        "suspicious": 0,
                        "undetected": 10,
                        "timeout": 0
                    }
                }
            }
        })
    }

    #[test]
    fn test_url_identifier_is_unpadded_url_safe_base64() {
        // Standard base64 would end in "==".
        assert_eq!(
            url_identifier("https://example.com"),
            "aHR0cHM6Ly9leGFtcGxlLmNvbQ"
        );
        assert!(!url_identifier("https://example.com/?a=b~").contains(['=', '+', '/']));
    }

    #[tokio::test]
    async fn test_clean_report_is_safe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/urls/aHR0cHM6Ly9leGFtcGxlLmNvbQ"))
            .and(header("x-apikey", "vt-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(report(0)))
            .expect(1)
            .mount(&server)
            .await;

        let url = normalize_and_validate("example.com").unwrap();
        let verdict = client_for(&server, Some("vt-key")).check(&url).await;
        assert_eq!(verdict.unwrap(), Verdict::Safe);
    }

    #[tokio::test]
    async fn test_flagged_report_is_malicious() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(report(3)))
            .mount(&server)
            .await;

        let url = normalize_and_validate("example.com").unwrap();
        let verdict = client_for(&server, Some("vt-key")).check(&url).await;
        assert_eq!(verdict.unwrap(), Verdict::Malicious);
    }

    #[tokio::test]
    async fn test_stats_without_malicious_count_are_safe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "attributes": {
                        "last_analysis_stats": { "harmless": 70, "undetected": 20 }
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = normalize_and_validate("example.com").unwrap();
        let verdict = client_for(&server, Some("vt-key")).check(&url).await;
        assert_eq!(verdict.unwrap(), Verdict::Safe);
    }

    #[tokio::test]
    async fn test_unknown_url_is_safe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": "NotFoundError", "message": "URL not found" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = normalize_and_validate("never-scanned.example").unwrap();
        let verdict = client_for(&server, Some("vt-key")).check(&url).await;
        assert_eq!(verdict.unwrap(), Verdict::Safe);
    }

    #[tokio::test]
    async fn test_rate_limited_is_retried_then_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(2)
            .mount(&server)
            .await;

        let url = normalize_and_validate("example.com").unwrap();
        let err = client_for(&server, Some("vt-key"))
            .check(&url)
            .await
            .unwrap_err();
        assert_eq!(err.verdict(), Verdict::Error);
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let url = normalize_and_validate("example.com").unwrap();
        let err = client_for(&server, Some("vt-key"))
            .check(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let server = MockServer::start().await;
        let url = normalize_and_validate("example.com").unwrap();
        let err = client_for(&server, None).check(&url).await.unwrap_err();
        assert_eq!(err.verdict(), Verdict::Unavailable);
    }
}
