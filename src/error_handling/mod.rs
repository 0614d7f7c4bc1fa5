//! Error handling.
//!
//! This module provides:
//! - Error type definitions (validation, provider, orchestration, initialization)
//! - Provider error categorization (verdict mapping, retriability)
//!
//! Errors are categorized into:
//! - **Input errors**: the URL is rejected and no report is produced
//! - **Provider configuration errors**: reported as an `Unavailable` verdict
//! - **Provider transient errors**: reported as an `Error` verdict

mod categorization;
mod types;

// Re-export public API
pub use types::{InitializationError, ProviderError, ValidationError, VerifyError};
