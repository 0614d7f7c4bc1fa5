//! Phishing registry check against PhishTank.
//!
//! Single attempt. PhishTank requires an identifying User-Agent on every
//! request.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use super::{transport_error, ThreatProvider};
use crate::error_handling::ProviderError;
use crate::models::Verdict;
use crate::normalize::NormalizedUrl;

const PROVIDER: &str = "phishtank";

#[derive(Debug, Deserialize)]
struct CheckUrlResponse {
    #[serde(default)]
    results: CheckUrlResults,
}

#[derive(Debug, Default, Deserialize)]
struct CheckUrlResults {
    #[serde(default)]
    in_database: bool,
    /// Only meaningful when `in_database` is set
    #[serde(default)]
    valid: bool,
}

/// PhishTank client.
///
/// `Malicious` only when the URL is in the database *and* currently marked a
/// valid phish.
pub struct PhishTankClient {
    client: Arc<reqwest::Client>,
    base_url: String,
    user_agent: String,
}

impl PhishTankClient {
    /// Creates a client for `base_url` identifying itself as `user_agent`.
    pub fn new(
        client: Arc<reqwest::Client>,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl ThreatProvider for PhishTankClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn check(&self, url: &NormalizedUrl) -> Result<Verdict, ProviderError> {
        let encoded = STANDARD.encode(url.as_str().as_bytes());
        let response = self
            .client
            .post(format!("{}/checkurl/", self.base_url))
            .header(USER_AGENT, &self.user_agent)
            .form(&[("url", encoded.as_str()), ("format", "json")])
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

        let body: CheckUrlResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::UnexpectedResponse {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;

        let results = body.results;
        match (results.in_database, results.valid) {
            (true, true) => {
                warn!("{PROVIDER}: {url} is a verified phish");
                Ok(Verdict::Malicious)
            }
            (true, false) => {
                debug!("{PROVIDER}: {url} is listed but no longer valid");
                Ok(Verdict::Safe)
            }
            (false, _) => Ok(Verdict::Safe),
        }
    }
}
