//! TLS certificate validity check.
//!
//! Connects to the host on the HTTPS port, completes a verified handshake
//! against the Mozilla root store and reads the leaf certificate's validity
//! window. Every failure (DNS, TCP, timeout, handshake, parsing, expiry)
//! yields the same invalid assessment.
//!
//! Uses `tokio-rustls` for the handshake and `x509-parser` for the certificate.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rustls::crypto::ring::default_provider;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use super::CertificateProvider;
use crate::config::{HTTPS_PORT, TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::models::CertificateAssessment;
use crate::normalize::NormalizedUrl;

/// Validity window of a leaf certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ValidityWindow {
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// Certificate checker.
///
/// The port and timeouts are configurable so tests can point it at local
/// listeners.
#[derive(Debug, Clone)]
pub struct TlsCertificateChecker {
    port: u16,
    connect_timeout: Duration,
    handshake_timeout: Duration,
}

impl Default for TlsCertificateChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsCertificateChecker {
    /// Checker for port 443 with the default connect and handshake timeouts.
    pub fn new() -> Self {
        Self {
            port: HTTPS_PORT,
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        }
    }

    /// Overrides the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the TCP connect and TLS handshake timeouts.
    pub fn with_timeouts(mut self, connect: Duration, handshake: Duration) -> Self {
        self.connect_timeout = connect;
        self.handshake_timeout = handshake;
        self
    }

    /// Performs the handshake and returns the peer certificate's validity window.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host is not a valid TLS server name
    /// - TCP connection fails or times out
    /// - TLS handshake fails or times out (this includes expired certificates)
    /// - The peer sent no certificate or it cannot be parsed
    async fn fetch_validity(&self, host: &str) -> Result<ValidityWindow> {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder_with_provider(Arc::new(default_provider()))
            .with_safe_default_protocol_versions()
            .context("Failed to configure TLS protocol versions")?
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let server_name = ServerName::try_from(host.to_string())
            .with_context(|| format!("Invalid server name: {host}"))?;

        let sock = tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((host, self.port)),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "TCP connection timeout for {}:{} ({}s)",
                host,
                self.port,
                self.connect_timeout.as_secs_f32()
            )
        })?
        .with_context(|| format!("Failed to connect to {}:{}", host, self.port))?;

        let connector = TlsConnector::from(Arc::new(config));
        let tls_stream = tokio::time::timeout(
            self.handshake_timeout,
            connector.connect(server_name, sock),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "TLS handshake timeout for {} ({}s)",
                host,
                self.handshake_timeout.as_secs_f32()
            )
        })?
        .with_context(|| format!("TLS handshake failed for {host}"))?;

        let cert = tls_stream
            .get_ref()
            .1
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or_else(|| anyhow::anyhow!("No peer certificate from {host}"))?;

        let (_, cert) = x509_parser::parse_x509_certificate(cert.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to parse certificate from {host}: {e}"))?;
        let validity = &cert.tbs_certificate.validity;

        Ok(ValidityWindow {
            not_before: to_utc(validity.not_before.timestamp())?,
            not_after: to_utc(validity.not_after.timestamp())?,
        })
    }
}

fn to_utc(timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| anyhow::anyhow!("Certificate time out of range: {timestamp}"))
}

/// Assesses a validity window at `now`.
///
/// Valid iff `now` is not before `not_before` and at least one whole day
/// remains until `not_after`.
pub(crate) fn assess_validity(window: ValidityWindow, now: DateTime<Utc>) -> CertificateAssessment {
    if now < window.not_before {
        return CertificateAssessment::invalid();
    }

    let days = (window.not_after - now).num_days();
    if days <= 0 {
        return CertificateAssessment::invalid();
    }

    CertificateAssessment::valid(u32::try_from(days).unwrap_or(u32::MAX))
}

#[async_trait]
impl CertificateProvider for TlsCertificateChecker {
    async fn assess(&self, url: &NormalizedUrl) -> CertificateAssessment {
        let host = url.host();
        debug!("tls: checking certificate for {host}:{}", self.port);

        match self.fetch_validity(host).await {
            Ok(window) => {
                let assessment = assess_validity(window, Utc::now());
                if assessment.valid {
                    info!(
                        "tls: certificate for {host} valid for {} more day(s)",
                        assessment.days_remaining
                    );
                } else {
                    warn!("tls: certificate for {host} is outside its validity window");
                }
                assessment
            }
            Err(e) => {
                warn!("tls: {e:#}");
                CertificateAssessment::invalid()
            }
        }
    }
}
