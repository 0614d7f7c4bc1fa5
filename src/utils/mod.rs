//! Shared helpers.
//!
//! This module provides:
//! - Bounded retries for provider calls
//! - Static regex compilation

mod retry;

pub(crate) use retry::retry_provider_call;

use regex::Regex;

/// Compiles a regex pattern that is a compile-time constant, panicking with a
/// detailed message if compilation fails.
pub(crate) fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}
