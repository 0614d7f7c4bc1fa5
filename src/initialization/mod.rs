//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger (plain or JSON)
//! - HTTP client used by the HTTP-based providers
//! - Process-wide TLS crypto provider
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Installs `ring` as the process-wide `rustls` provider. Must run before the
/// first TLS connection made through `reqwest`.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
