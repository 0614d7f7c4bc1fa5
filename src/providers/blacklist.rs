//! Blacklist check against Google Safe Browsing (v4 Lookup API).

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{transport_error, ThreatProvider};
use crate::config::{CLIENT_ID, CLIENT_VERSION};
use crate::error_handling::ProviderError;
use crate::models::Verdict;
use crate::normalize::NormalizedUrl;
use crate::utils::retry_provider_call;

const PROVIDER: &str = "safe_browsing";

/// Threat categories matched against the submitted URL.
const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo,
    threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: &'static str,
    client_version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'static [&'static str],
    platform_types: [&'static str; 1],
    threat_entry_types: [&'static str; 1],
    threat_entries: [ThreatEntry<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

/// The API answers `{}` when nothing matched.
#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<serde_json::Value>,
}

/// Google Safe Browsing client.
///
/// Without an API key every check fails with
/// [`ProviderError::MissingCredential`].
pub struct SafeBrowsingClient {
    client: Arc<reqwest::Client>,
    api_key: Option<String>,
    base_url: String,
}

impl SafeBrowsingClient {
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

    async fn find_threat_matches(&self, api_key: &str, url: &str) -> Result<Verdict, ProviderError> {
        let body = FindRequest {
            client: ClientInfo {
                client_id: CLIENT_ID,
                client_version: CLIENT_VERSION,
            },
            threat_info: ThreatInfo {
                threat_types: &THREAT_TYPES,
                platform_types: ["ANY_PLATFORM"],
                threat_entry_types: ["URL"],
                threat_entries: [ThreatEntry { url }],
            },
        };

        let response = self
            .client
            .post(format!("{}/v4/threatMatches:find", self.base_url))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let found: FindResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::UnexpectedResponse {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;

        if found.matches.is_empty() {
            debug!("{PROVIDER}: no threat matches for {url}");
            Ok(Verdict::Safe)
        } else {
            warn!(
                "{PROVIDER}: {} threat match(es) for {url}",
                found.matches.len()
            );
            Ok(Verdict::Malicious)
        }
    }
}

#[async_trait]
impl ThreatProvider for SafeBrowsingClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn check(&self, url: &NormalizedUrl) -> Result<Verdict, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!("{PROVIDER}: API key not configured, skipping");
            return Err(ProviderError::MissingCredential { provider: PROVIDER });
        };

        retry_provider_call(PROVIDER, || self.find_threat_matches(api_key, url.as_str())).await
    }
}
