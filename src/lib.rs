//! phishguard library: multi-provider URL threat verification
//!
//! This library validates and normalizes a candidate URL, checks it against
//! several independent signal providers and merges their answers into one
//! fixed-shape report:
//! - Blacklist (Google Safe Browsing)
//! - Reputation aggregator (VirusTotal)
//! - Phishing registry (PhishTank)
//! - TLS certificate validity
//! - Public suffix validity
//! - Domain registration (WHOIS)
//!
//! A failing or unconfigured provider never aborts the request; it shows up
//! as that provider's `Error`/`Unavailable` verdict (or its invalid/absent
//! default) while every other field is still filled in.
//!
//! # Example
//!
//! ```no_run
//! use phishguard::{Config, ProviderCredentials, Verifier};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     credentials: ProviderCredentials::from_env(),
//!     ..Default::default()
//! };
//!
//! let verifier = Verifier::from_config(&config)?;
//! match verifier.verify("example.com").await {
//!     Ok(report) => println!("blacklist: {}", report.blacklist),
//!     Err(e) => println!("rejected ({}): {}", e.code(), e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
pub mod initialization;
mod models;
mod normalize;
pub mod providers;
pub mod server;
mod utils;
mod verify;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, ProviderCredentials, ProviderEndpoints};
pub use error_handling::{InitializationError, ProviderError, ValidationError, VerifyError};
pub use models::{
    CertificateAssessment, RegistrationRecord, SuffixStatus, Verdict, VerificationReport,
};
pub use normalize::{normalize_and_validate, NormalizedUrl};
pub use verify::{Providers, Verifier};
