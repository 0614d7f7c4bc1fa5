//! Domain registration lookup using the `whois-service` crate.
//!
//! The crate handles RDAP/WHOIS server discovery and referrals; this adapter
//! picks the query key, bounds the lookup with its own timeout and maps the
//! parsed answer onto a [`RegistrationRecord`].

mod parse;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use whois_service::{WhoisClient, WhoisResponse};

use super::suffix::registrable_domain;
use super::RegistrationProvider;
use crate::config::WHOIS_TIMEOUT;
use crate::models::RegistrationRecord;
use crate::normalize::NormalizedUrl;

use parse::registration_record;

/// Registration lookup.
///
/// The timeout bounds the whole lookup; `whois-service` would otherwise wait
/// up to its own 30 s default.
#[derive(Debug, Clone)]
pub struct WhoisLookup {
    timeout: Duration,
}

impl Default for WhoisLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisLookup {
    /// Lookup bounded by the default 10 s timeout.
    pub fn new() -> Self {
        Self {
            timeout: WHOIS_TIMEOUT,
        }
    }

    /// Overrides the overall lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

async fn query(domain: &str) -> Result<WhoisResponse> {
    // Lightweight; one client per lookup
    let client = WhoisClient::new()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create WHOIS client: {}", e))?;
    client
        .lookup(domain)
        .await
        .map_err(|e| anyhow::anyhow!("WHOIS query failed: {}", e))
}

fn record_from_response(domain: &str, response: &WhoisResponse) -> Option<RegistrationRecord> {
    let Some(parsed) = &response.parsed_data else {
        debug!("whois: unparsed answer for {domain}");
        return None;
    };

    registration_record(
        domain,
        parsed.registrar.as_deref(),
        parsed.creation_date.as_deref(),
        parsed.expiration_date.as_deref(),
        &parsed.name_servers,
    )
}

#[async_trait]
impl RegistrationProvider for WhoisLookup {
    async fn lookup(&self, url: &NormalizedUrl) -> Option<RegistrationRecord> {
        let domain = registrable_domain(url.host()).unwrap_or_else(|| url.host().to_string());
        debug!("whois: looking up {domain}");

        let response = match tokio::time::timeout(self.timeout, query(&domain)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("whois: lookup for {domain} failed: {e:#}");
                return None;
            }
            Err(_) => {
                warn!(
                    "whois: lookup for {domain} timed out after {}s",
                    self.timeout.as_secs_f32()
                );
                return None;
            }
        };

        let record = record_from_response(&domain, &response);
        match &record {
            Some(record) => info!("whois: {domain} registered with {}", record.registrar),
            None => info!("whois: no registration data for {domain}"),
        }
        record
    }
}
