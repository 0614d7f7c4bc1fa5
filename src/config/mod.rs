//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, endpoints)
//! - Library configuration types (`Config`, credentials, endpoints)

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, ProviderCredentials, ProviderEndpoints};
